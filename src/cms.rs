mod client;
mod memory;
mod models;
mod prismic;

pub use self::{
    client::{Cms, ContentClient},
    memory::MemoryClient,
    models::{Filter, Ordering, QueryOptions, QueryResponse, RawDocument, link_resolver},
    prismic::PrismicClient,
};
