//! Benchmark tests for critical operations
//!
//! Run with: cargo test --release bench -- --ignored --nocapture

use std::sync::Arc;
use std::time::Instant;
use tempfile::NamedTempFile;

use shortlinks::database::init_db;
use shortlinks::resolver::short_path_candidate;
use shortlinks::service::LinkService;
use shortlinks::store::LinkStore;

/// Benchmark helper to measure execution time
fn benchmark<F>(name: &str, iterations: usize, mut f: F)
where
    F: FnMut(usize),
{
    let start = Instant::now();

    for i in 0..iterations {
        f(i);
    }

    let duration = start.elapsed();
    let avg_ms = duration.as_millis() as f64 / iterations as f64;
    let ops_per_sec = (iterations as f64 / duration.as_secs_f64()) as u64;

    println!("  {} ({} iterations)", name, iterations);
    println!("    Total time: {:?}", duration);
    println!("    Avg time: {:.3}ms", avg_ms);
    println!("    Throughput: {} ops/sec\n", ops_per_sec);
}

fn setup_service() -> (LinkService, NamedTempFile) {
    let temp_db = NamedTempFile::new().unwrap();
    let db = init_db(temp_db.path().to_str().unwrap()).unwrap();
    let store = LinkStore::new(Arc::new(db));
    (LinkService::new(store, "http://localhost:8080"), temp_db)
}

#[test]
#[ignore] // Run explicitly with: cargo test bench --release -- --ignored --nocapture
fn bench_create_links() {
    println!("\n=== Benchmark: Create Links ===\n");

    let (service, _temp_db) = setup_service();

    benchmark("Create", 1000, |i| {
        service
            .create_link("https://example.com/bench", &format!("bench-{}", i))
            .unwrap();
    });
}

#[test]
#[ignore]
fn bench_resolve_links() {
    println!("\n=== Benchmark: Resolve Links ===\n");

    let (service, _temp_db) = setup_service();

    println!("  Preparing: Creating 1000 links...");
    for i in 0..1000 {
        service
            .create_link(&format!("https://example.com/{}", i), &format!("resolve-{}", i))
            .unwrap();
    }
    println!("  Done!\n");

    benchmark("Resolve hit", 10000, |i| {
        let path = format!("/resolve-{}", i % 1000);
        let candidate = short_path_candidate(&path).unwrap();
        service.store().find_by_path(candidate).unwrap();
    });

    benchmark("Resolve miss", 10000, |i| {
        let path = format!("/missing-{}", i);
        let candidate = short_path_candidate(&path).unwrap();
        assert!(service.store().find_by_path(candidate).is_err());
    });

    benchmark("List all", 100, |_| {
        service.list_links().unwrap();
    });
}
