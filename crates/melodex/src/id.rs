use serde::{Deserialize, Serialize};

macro_rules! id {
    ($($id:ident),*$(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
            #[serde(transparent)]
            #[repr(transparent)]
            pub struct $id(u64);

            impl From<u64> for $id {
                fn from(value: u64) -> Self {
                    Self(value)
                }
            }

            impl ::std::str::FromStr for $id {
                type Err = ::std::num::ParseIntError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    s.trim().parse::<u64>().map(Self)
                }
            }

            impl ::std::fmt::Display for $id {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    self.0.fmt(f)
                }
            }
        )*
    };
}

id![
    SongId,
    PerformerId,
    PlaylistId,
    UserId,
    SongRatingId,
    PerformerRatingId,
];
