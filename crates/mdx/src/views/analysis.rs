use std::fmt::Write;

use melodex::{
    analysis::{
        DECADES, DailyAverage, MONTH_WINDOWS, RatedSong, SortColumn, SortOrder, peak,
        share_text, tweet_url,
    },
    format::{readable_date, stars},
};

use super::{View, first_word, number};
use crate::shell::{
    data::Data,
    render::{Table, heading, list},
    router::Route,
    view::ListView,
};

const BAR_WIDTH: f64 = 20.0;
const DAYS_PER_MONTH: u32 = 30;

fn rated_table(songs: &[&RatedSong]) -> String {
    let mut table = Table::new(&["Title", "Performer", "Album", "Rating", "Added"]);
    for rated in songs {
        table.row([
            rated.song.title.clone(),
            rated.song.performer_names(),
            rated.song.album.clone(),
            stars(rated.first_rating()),
            rated
                .date_added
                .as_deref()
                .map(readable_date)
                .unwrap_or_default(),
        ]);
    }
    table.render()
}

fn chart(days: &[&DailyAverage]) -> String {
    let mut out = String::new();
    for day in days {
        let len = (day.average_rating.clamp(0.0, 5.0) / 5.0 * BAR_WIDTH).round() as usize;
        writeln!(out, "{:<12} {:<20} {:.2}", day.date, "█".repeat(len), day.average_rating).ok();
    }
    out
}

fn plural(n: u32) -> &'static str {
    if n == 1 { "" } else { "s" }
}

pub struct AnalysisView {
    decade: u16,
    count: u32,
    by_decade: ListView<RatedSong>,
    months: u32,
    order: SortOrder,
    recent: ListView<RatedSong>,
    daily_months: u32,
    daily: ListView<DailyAverage>,
    shared: Option<(String, String)>,
}

impl Default for AnalysisView {
    fn default() -> Self {
        Self {
            decade: 1980,
            count: 5,
            by_decade: ListView::default(),
            months: MONTH_WINDOWS[0],
            order: SortOrder::default(),
            recent: ListView::default(),
            daily_months: 1,
            daily: ListView::default(),
            shared: None,
        }
    }
}

impl View for AnalysisView {
    const COMMANDS: &'static [(&'static str, &'static str)] = &[
        ("decade <year> [count]", "top rated songs released in a decade"),
        ("months <n>", "top rated songs added in the last 1, 2, 3, 6 or 12 months"),
        ("sort date|rating", "sort the recent list; again to flip direction"),
        ("daily <months>", "daily average rating over the last n months"),
        ("share decade|months", "share text and tweet link for a top list"),
        ("find <text>", "filter both song lists"),
    ];

    async fn mount(&mut self, data: &Data) {
        self.load_decade(data).await;
        self.load_recent(data).await;
        self.load_daily(data).await;
    }

    async fn handle(&mut self, data: &Data, cmd: &str, args: &str) -> bool {
        match cmd {
            "decade" => {
                let (year, count) = first_word(args);
                let Some(year) = number::<u16>(data, year, "decade") else {
                    return true;
                };
                if !DECADES.contains(&year) {
                    let years: Vec<String> = DECADES.iter().map(ToString::to_string).collect();
                    data.toasts
                        .warn(format!("Pick one of: {}.", years.join(", ")));
                    return true;
                }
                if !count.is_empty() {
                    match number::<u32>(data, count, "count") {
                        Some(n) if n > 0 => self.count = n,
                        _ => return true,
                    }
                }
                self.decade = year;
                self.load_decade(data).await;
            }
            "months" => {
                let Some(months) = number::<u32>(data, args, "number of months") else {
                    return true;
                };
                if !MONTH_WINDOWS.contains(&months) {
                    data.toasts.warn("Pick 1, 2, 3, 6 or 12 months.");
                    return true;
                }
                self.months = months;
                self.load_recent(data).await;
            }
            "sort" => {
                let column = match args.trim() {
                    "date" => SortColumn::DateAdded,
                    "rating" => SortColumn::Rating,
                    _ => {
                        data.toasts.warn("Sort by `date` or `rating`.");
                        return true;
                    }
                };
                self.order = self.order.toggle(column);
                self.sort_recent();
            }
            "daily" => {
                match number::<u32>(data, args, "number of months") {
                    Some(n) if n > 0 => {
                        self.daily_months = n;
                        self.load_daily(data).await;
                    }
                    Some(_) => data.toasts.warn("Please enter a valid number of months."),
                    None => {}
                }
            }
            "share" => self.share(data, args.trim()),
            "find" => {
                self.by_decade.set_query(args);
                self.recent.set_query(args);
            }
            _ => return false,
        }
        true
    }

    fn render(&self, _data: &Data) -> String {
        let mut out = String::new();
        heading(&mut out, Route::Analysis.title());

        writeln!(out, "Top {} from the {}s", self.count, self.decade).ok();
        list(&mut out, &self.by_decade, "No rated songs from this decade.", rated_table);

        let direction = if self.order.ascending { "asc" } else { "desc" };
        let column = match self.order.column {
            SortColumn::DateAdded => "date",
            SortColumn::Rating => "rating",
        };
        writeln!(
            out,
            "\nTop rated from the last {} month{} (by {column}, {direction})",
            self.months,
            plural(self.months)
        )
        .ok();
        list(&mut out, &self.recent, "No songs rated in this period.", rated_table);

        let days = self.daily_months * DAYS_PER_MONTH;
        writeln!(out, "\nDaily average rating, last {days} days").ok();
        list(&mut out, &self.daily, "No ratings in this period.", chart);
        if let Some(best) = peak(self.daily.items()) {
            writeln!(out, "Peak: {} ({:.2})", best.date, best.average_rating).ok();
        }

        if let Some((text, url)) = &self.shared {
            writeln!(out, "\n{text}\n{url}").ok();
        }
        out
    }
}

impl AnalysisView {
    async fn load_decade(&mut self, data: &Data) {
        self.by_decade
            .load(
                data,
                "fetching the songs",
                data.client.top_rated_by_decade(self.decade, self.count),
            )
            .await;
    }

    async fn load_recent(&mut self, data: &Data) {
        self.recent
            .load(
                data,
                "fetching the songs",
                data.client.top_rated_from_last_months(self.months),
            )
            .await;
        self.sort_recent();
    }

    async fn load_daily(&mut self, data: &Data) {
        self.daily
            .load(
                data,
                "fetching the daily average ratings",
                data.client
                    .daily_average_rating(self.daily_months * DAYS_PER_MONTH),
            )
            .await;
    }

    fn sort_recent(&mut self) {
        if let Some(songs) = self.recent.items_mut() {
            self.order.apply(songs);
        }
    }

    fn share(&mut self, data: &Data, which: &str) {
        let (scope, songs) = match which {
            "decade" => (format!("from the {}s!", self.decade), self.by_decade.items()),
            "months" => (
                format!("from the last {} month{}!", self.months, plural(self.months)),
                self.recent.items(),
            ),
            _ => {
                data.toasts.warn("Share `decade` or `months`.");
                return;
            }
        };

        let text = share_text(&scope, songs);
        let url = tweet_url(&text);
        self.shared = Some((text, url));
    }
}
