use std::time::Duration;

use reel_core::error::AppError;
use reel_core::{BoxOfficeService, DetailService, DiscoveryService, Table};

use crate::integration::common::{LineParser, RoutedFetcher, api_config, box_office_config};

const PAGE_ONE: &str = r#"{"page": 1, "results": [
    {"id": 550, "title": "Fight Club", "popularity": 61.4, "genre_ids": [18]},
    {"id": 13, "title": "Forrest Gump", "popularity": 48.2, "genre_ids": [35, 18]}
]}"#;

const PAGE_TWO: &str = r#"{"page": 2, "results": [
    {"id": 680, "title": "Pulp Fiction", "popularity": 70.1, "genre_ids": [53, 80]}
]}"#;

const TITLE_PAGE: &str = "Domestic|$100|$200
Domestic|$50|$75
Latin America|$1|$2
summary|$275|$25|$300";

fn detail(imdb_id: &str, genre: &str) -> String {
    format!(
        r#"{{"budget": 1000, "genres": [{{"name": "{genre}"}}], "imdb_id": "{imdb_id}",
            "production_companies": [], "production_countries": [{{"name": "United States of America"}}],
            "revenue": 5000, "runtime": 120, "status": "Released", "tagline": null,
            "spoken_languages": [{{"name": "English"}}, {{"name": "French"}}]}}"#
    )
}

fn status(code: u16) -> AppError {
    AppError::HttpStatus {
        status: code,
        url: "https://api.example.com/3".into(),
    }
}

#[tokio::test]
async fn discovery_recovers_after_two_failures() {
    let fetcher = RoutedFetcher::new().route(
        "page=1",
        vec![Err(status(500)), Err(status(502)), Ok(PAGE_ONE.into())],
    );

    let records = DiscoveryService::new(fetcher.clone())
        .with_retry_delay(Duration::ZERO)
        .fetch_pages(&api_config(), 1, 3)
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["title"], "Fight Club");
    assert_eq!(fetcher.calls_matching("/discover/movie"), 3);
}

#[tokio::test]
async fn full_pipeline_over_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movies.csv");

    let fetcher = RoutedFetcher::new()
        .route("page=1", vec![Ok(PAGE_ONE.into())])
        .route("page=2", vec![Ok(PAGE_TWO.into())])
        .route("/movie/550?", vec![Ok(detail("tt0137523", "Drama"))])
        .route("/movie/13?", vec![Err(status(404))])
        .route("/movie/680?", vec![Ok(detail("tt0110912", "Thriller"))])
        .route("/title/tt0137523/", vec![Ok(TITLE_PAGE.into())])
        .route("/title/tt0110912/", vec![Err(status(503))]);

    // Discovery
    let discovered = DiscoveryService::new(fetcher.clone())
        .with_retry_delay(Duration::ZERO)
        .save_to_csv(&api_config(), 2, 1, &path)
        .await
        .unwrap();
    assert_eq!(discovered.len(), 3);
    assert_eq!(discovered.headers(), &["id", "title", "popularity", "genre_ids"]);

    // Details, in place
    let report = DetailService::new(fetcher.clone())
        .add_details_to_csv(&api_config(), &path, &path)
        .await
        .unwrap();
    assert_eq!(report.enriched, 2);
    assert_eq!(report.failed, 1);

    let table = Table::read_csv(&path).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.headers().len(), 4 + 10);
    assert_eq!(table.get_by_name(0, "genres"), Some("Drama"));
    assert_eq!(table.get_by_name(0, "spoken_languages"), Some("English, French"));
    assert_eq!(table.get_by_name(0, "tagline"), None);
    assert_eq!(table.get_by_name(1, "imdb_id"), None);
    assert_eq!(table.get_by_name(1, "budget"), None);
    assert_eq!(table.get_by_name(2, "imdb_id"), Some("tt0110912"));

    // Box office, in place
    let service = BoxOfficeService::new(fetcher.clone(), LineParser, box_office_config());
    let report = service.update_table(&path, &path).await.unwrap();
    assert_eq!(report.total, 3);
    assert_eq!(report.updated, 1);
    assert_eq!(report.skipped, 1);

    let table = Table::read_csv(&path).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.get_by_name(0, "domestic_opening"), Some("150"));
    assert_eq!(table.get_by_name(0, "domestic_gross"), Some("275"));
    assert_eq!(table.get_by_name(0, "latin_america_gross"), Some("2"));
    assert_eq!(table.get_by_name(0, "domestic"), Some("275"));
    assert_eq!(table.get_by_name(0, "worldwide"), Some("300"));
    assert_eq!(table.get_by_name(2, "domestic_gross"), None);
    assert_eq!(table.get_by_name(2, "title"), Some("Pulp Fiction"));

    assert_eq!(fetcher.calls_matching("/title/"), 2);
}

#[tokio::test]
async fn box_office_stage_rejects_table_without_imdb_ids() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("movies.csv");
    let output = dir.path().join("out.csv");
    std::fs::write(&input, "id,title\n550,Fight Club\n").unwrap();

    let service = BoxOfficeService::new(RoutedFetcher::new(), LineParser, box_office_config());
    let err = service.update_table(&input, &output).await.unwrap_err();

    assert!(matches!(err, AppError::MissingRequiredColumn(_)));
    assert!(err.is_fatal());
    assert!(!output.exists());
}
