pub mod data;
pub mod expiry;
pub mod render;
pub mod router;
pub mod toast;
pub mod view;

use std::{io::Write, sync::Arc, time::Duration};

use melodex::Melodex;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
    task::{JoinError, JoinHandle},
    time::Instant,
};

use crate::{config::Config, views::Screen};
use data::Data;
use router::{Navigator, Route, guard};
use toast::{Notifier, ToastTask};

const GLOBAL_COMMANDS: &[(&str, &str)] = &[
    ("go <path>", "open a page, e.g. `go /library`"),
    ("pages", "list every page"),
    ("refresh", "reload the current page"),
    ("logout", "end the session"),
    ("help", "show this help"),
    ("quit", "leave"),
];

pub const BUSY: &str = "Please wait for the current operation to finish.";

/// How long a job runs before the shell mentions it is still loading.
const LOADING_NOTICE: Duration = Duration::from_millis(300);

enum Job {
    Mount,
    Command { cmd: String, args: String },
    Logout,
}

enum Outcome {
    Shown,
    Unknown(String),
    LoggedOut,
}

/// A job on its own task. It owns the screen until it finishes.
struct Running {
    task: JoinHandle<(Screen, Outcome)>,
    notice_at: Option<Instant>,
}

/// The screen currently shown and the navigation rules around it.
///
/// Mounts and commands run on spawned tasks so input keeps being read while
/// a request is in flight. While one runs, `go`, `logout`, `help`, `pages`
/// and `quit` still work and every other command is refused.
pub struct Shell {
    data: Data,
    route: Route,
    screen: Option<Screen>,
    running: Option<Running>,
}

impl Shell {
    pub fn new(data: Data) -> Self {
        Self {
            data,
            route: Route::Login,
            screen: Some(Screen::for_route(Route::Login)),
            running: None,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn is_busy(&self) -> bool {
        self.running.is_some()
    }

    /// Guards, builds and starts mounting the screen for `requested`.
    pub fn open(&mut self, requested: Route) {
        let route = guard(requested, self.data.session());
        if route != requested {
            tracing::info!(requested = requested.path(), "not logged in, showing login");
        }
        tracing::debug!(path = route.path(), "opening");

        self.detach();
        self.route = route;
        self.screen = Some(Screen::for_route(route));
        self.run(Job::Mount);
    }

    /// Leaves the running job to finish on its own. Requests are not
    /// cancelled; whatever they return is dropped with the old screen.
    fn detach(&mut self) {
        if self.running.take().is_some() {
            tracing::debug!(path = self.route.path(), "leaving with a request in flight");
        }
    }

    fn run(&mut self, job: Job) {
        let mut screen = self
            .screen
            .take()
            .unwrap_or_else(|| Screen::for_route(self.route));
        let data = self.data.clone();

        let task = tokio::spawn(async move {
            let outcome = match job {
                Job::Mount => {
                    screen.mount(&data).await;
                    Outcome::Shown
                }
                Job::Command { cmd, args } => {
                    if screen.handle(&data, &cmd, &args).await {
                        Outcome::Shown
                    } else {
                        Outcome::Unknown(cmd)
                    }
                }
                Job::Logout => {
                    if let Err(e) = data.client.logout().await {
                        tracing::warn!(error = %e, "logout request failed");
                    }
                    Outcome::LoggedOut
                }
            };
            (screen, outcome)
        });

        self.running = Some(Running {
            task,
            notice_at: Some(Instant::now() + LOADING_NOTICE),
        });
    }

    fn finish(&mut self, result: Result<(Screen, Outcome), JoinError>) {
        self.running = None;
        match result {
            Ok((screen, Outcome::Shown)) => {
                self.screen = Some(screen);
                self.show();
            }
            Ok((screen, Outcome::Unknown(cmd))) => {
                self.screen = Some(screen);
                self.data
                    .toasts
                    .warn(format!("Unknown command `{cmd}`. Type `help`."));
            }
            Ok((_, Outcome::LoggedOut)) => {
                self.data.toasts.success("Logged out.");
                self.open(Route::Login);
            }
            Err(e) => {
                tracing::error!(error = %e, path = self.route.path(), "page task failed");
                self.screen = Some(Screen::for_route(self.route));
                self.data
                    .toasts
                    .error("Something went wrong. Type `refresh` to reload the page.");
            }
        }
    }

    /// Waits on the running job. Prints a loading notice if it is slow, then
    /// settles it. Never resolves while idle.
    pub async fn wait(&mut self) {
        let Some(running) = self.running.as_mut() else {
            return std::future::pending().await;
        };

        let result = match running.notice_at {
            Some(at) => tokio::select! {
                result = &mut running.task => result,
                () = tokio::time::sleep_until(at) => {
                    running.notice_at = None;
                    println!("{} Type `go <path>` to leave or `quit` to exit.", render::LOADING);
                    return;
                }
            },
            None => (&mut running.task).await,
        };
        self.finish(result);
    }

    /// Runs jobs until none is left, including any a finished job started.
    pub async fn settle(&mut self) {
        while self.is_busy() {
            self.wait().await;
        }
    }

    fn show(&self) {
        if let Some(screen) = &self.screen {
            println!("\n{}", screen.render(&self.data));
        }
    }

    fn help(&self) {
        let mut lines: Vec<(&str, &str)> = Screen::commands(self.route).to_vec();
        lines.extend_from_slice(GLOBAL_COMMANDS);
        let width = lines.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
        for (usage, about) in lines {
            println!("  {usage:<width$}  {about}");
        }
    }

    /// Takes one input line. Returns `false` when the user asked to leave.
    pub fn command(&mut self, line: &str) -> bool {
        let (cmd, args) = crate::views::split_command(line);
        match cmd {
            "" => {}
            "quit" | "exit" => return false,
            "help" => self.help(),
            "pages" => {
                for route in Route::ALL {
                    println!("  {:<18} {}", route.path(), route.title());
                }
            }
            "go" => match Route::parse(args) {
                Some(route) => self.open(route),
                None => self
                    .data
                    .toasts
                    .warn(format!("No page at `{}`.", args.trim())),
            },
            "logout" => {
                self.detach();
                self.run(Job::Logout);
            }
            _ if self.is_busy() => self.data.toasts.warn(BUSY),
            "refresh" => self.run(Job::Mount),
            _ => self.run(Job::Command {
                cmd: cmd.to_string(),
                args: args.to_string(),
            }),
        }
        true
    }
}

fn prompt(route: Route) {
    print!("{}> ", route.path());
    std::io::stdout().flush().ok();
}

pub async fn start(client: Melodex, config: Config, start: Route) -> anyhow::Result<()> {
    tracing::info!(base_url = %client.base_url(), "starting shell");

    let (toast_tx, toast_rx) = mpsc::unbounded_channel();
    let toast_task = tokio::spawn(ToastTask::new(toast_rx).run());
    let (nav_tx, mut nav_rx) = mpsc::unbounded_channel();

    let data = Data::new(
        Arc::new(config),
        client,
        Notifier::new(toast_tx),
        Navigator::new(nav_tx),
    );

    {
        let mut shell = Shell::new(data);
        shell.open(start);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            if !shell.is_busy() {
                prompt(shell.route());
            }
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    if !shell.command(&line) {
                        break;
                    }
                }
                Some(route) = nav_rx.recv() => shell.open(route),
                () = shell.wait() => {}
            }
        }
    }

    // let queued toasts print before exiting
    tokio::time::timeout(Duration::from_secs(1), toast_task)
        .await
        .ok();

    tracing::info!("bye");
    Ok(())
}
