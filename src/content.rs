mod aggregator;
mod date;
mod models;
mod reading;

pub use self::{
    aggregator::PostAggregator,
    date::{display_date, parse_publication_date},
    models::{NavLink, NavigationLinks, PostDetail, PostPage, PostSummary, PostView, Section},
    reading::{WORDS_PER_MINUTE, compute_reading_time, count_words},
};
