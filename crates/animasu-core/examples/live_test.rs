use animasu_core::AnimasuScraper;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("animasu_core=debug")),
        )
        .init();

    let scraper = AnimasuScraper::new()?;

    println!("Ongoing series, page 1:\n");
    let ongoing = scraper.ongoing_series(1).await?;
    for (i, card) in ongoing.anime.iter().enumerate() {
        println!(
            "  {}. {} [{}] - {}",
            i + 1,
            card.title.as_deref().unwrap_or("?"),
            card.episode.as_deref().unwrap_or("-"),
            card.slug.as_deref().unwrap_or("-"),
        );
    }
    println!(
        "\nnext page: {:?}, previous page: {:?}",
        ongoing.pagination.next_page, ongoing.pagination.prev_page
    );

    let Some(slug) = ongoing.anime.iter().find_map(|card| card.slug.clone()) else {
        println!("No cards found");
        return Ok(());
    };

    println!("\nDetail of {}:\n", slug);
    let details = scraper.anime_details(&slug).await?;
    for detail in &details {
        println!("{}", serde_json::to_string_pretty(detail)?);
    }

    let episode = details
        .iter()
        .flat_map(|detail| detail.episodes.iter())
        .find_map(|episode| episode.slug.clone());

    if let Some(episode) = episode {
        println!("\nMirrors of {}:\n", episode);
        let page = scraper.anime_episode(&episode).await?;
        for mirror in &page.mirrors {
            println!(
                "  {} -> {}",
                mirror.label.as_deref().unwrap_or("?"),
                mirror.stream_url
            );
        }
    }

    // Second call is answered from the cache.
    scraper.ongoing_series(1).await?;
    println!("\n{} pages cached", scraper.cache().len());

    Ok(())
}
