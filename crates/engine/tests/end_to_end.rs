//! End-to-end: dataset files on disk -> catalog -> engine -> ranked list.

use std::fs;
use std::path::PathBuf;

use data_loader::Catalog;
use engine::{HybridEngine, RecommendationService};
use fusion::{FusionConfig, RecommendationSummary};

fn write_dataset(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("engine-e2e-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();

    fs::write(
        dir.join("movies.csv"),
        "movieId,title,genres\n\
         1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy\n\
         2,Jumanji (1995),Adventure|Children|Fantasy\n\
         3,Grumpier Old Men (1995),Comedy|Romance\n\
         4,Heat (1995),Action|Crime|Thriller\n\
         5,\"American President, The (1995)\",Comedy|Drama|Romance\n\
         6,Nixon (1995),Drama\n",
    )
    .unwrap();
    fs::write(
        dir.join("ratings.csv"),
        "userId,movieId,rating,timestamp\n\
         1,1,4.0,964982703\n\
         1,2,4.0,964981247\n\
         1,3,3.0,964982224\n\
         2,1,5.0,964983815\n\
         2,2,3.5,964982931\n\
         3,4,4.5,964982400\n\
         3,6,4.0,964980868\n\
         4,3,3.0,964982176\n\
         4,5,4.0,964984041\n",
    )
    .unwrap();
    dir
}

#[test]
fn test_recommend_from_files() {
    let dir = write_dataset("sync");
    let catalog = Catalog::load_from_dir(&dir).unwrap();
    let engine = HybridEngine::build(&catalog, FusionConfig::default()).unwrap();

    let ranked = engine.recommend("toy story (1995)");
    assert!(!ranked.is_empty());
    assert_eq!(ranked[0].title, "jumanji (1995)");
    assert!(ranked.iter().all(|r| r.title != "toy story (1995)"));

    let summary = RecommendationSummary::from_recommendations(&ranked).unwrap();
    assert_eq!(summary.count, ranked.len());
    assert_eq!(summary.best_score, ranked[0].score);

    // quoted title with a comma survives the round trip through the loader
    assert!(engine.contains("American President, The (1995)"));

    fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_service_from_files() {
    let dir = write_dataset("async");
    let catalog = Catalog::load_from_dir(&dir).unwrap();
    let engine = HybridEngine::build(&catalog, FusionConfig::default()).unwrap();
    let service = RecommendationService::new(engine);

    let ranked = service.recommend("Heat (1995)").await.unwrap();
    assert!(ranked.iter().all(|r| r.title != "heat (1995)"));
    assert!(service.recommend("Casablanca (1942)").await.unwrap().is_empty());

    fs::remove_dir_all(&dir).unwrap();
}
