use zeroblog::{
    config::Settings,
    content::PostAggregator,
    error::Result,
    pagination::{LoadOutcome, PaginationCursor},
};

/// 逐页列出所有文章，每行一篇：日期、uid、标题
#[tokio::main]
async fn main() {
    zeroblog::init_tracing();

    if let Err(e) = list_posts().await {
        eprintln!("❌ Failed to list posts: {}", e);
        std::process::exit(1);
    }
}

async fn list_posts() -> Result<()> {
    let settings = Settings::from_env()?;
    let client = settings.cms_client()?;
    let aggregator = PostAggregator::new(settings.cms.document_type.clone())
        .with_ordering(settings.cms.adjacency_ordering.clone());

    let first = aggregator
        .first_page(&client, settings.listing.page_size)
        .await?;
    let mut cursor = PaginationCursor::initial(first);
    let mut printed = 0;

    loop {
        for post in &cursor.loaded_posts()[printed..] {
            println!(
                "{:<12} {:<40} {}",
                post.display_date.as_deref().unwrap_or("-"),
                post.uid,
                post.title
            );
        }
        printed = cursor.loaded_posts().len();

        match cursor.load_more(&client, &aggregator).await? {
            LoadOutcome::Loaded(_) => continue,
            _ => break,
        }
    }

    println!("{} posts, {} pages", printed, cursor.current_page());
    Ok(())
}
