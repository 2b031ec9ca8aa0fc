//! Build a small index and print which datasets hold each query k-mer
//!
//! Run with: RUST_LOG=kmertree=debug cargo run --example query_kmers

use std::collections::HashMap;

use kmertree::config::FilterConfig;
use kmertree::index::IndexTree;

fn main() -> Result<(), kmertree::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let datasets = ["Dataset1", "Dataset2", "Dataset3", "Dataset4"];
    let kmers = HashMap::from([
        ("Dataset1".to_string(), vec!["ACGT", "TGCA", "GCTA"]),
        ("Dataset2".to_string(), vec!["CGTA", "GCTA", "TACC"]),
        ("Dataset3".to_string(), vec!["AAGT", "TCCA", "CGGT"]),
        ("Dataset4".to_string(), vec!["TGGC", "GGCA", "CCAA"]),
    ]);
    let config = FilterConfig::new(100, 1)?;

    let tree = IndexTree::build_with_config(&datasets, &kmers, &config)?;
    tracing::info!(
        datasets = tree.len(),
        nodes = tree.node_count(),
        depth = tree.depth(),
        bytes = tree.size_bytes(),
        "index ready"
    );

    for kmer in ["GCTA", "TCCA", "ACGT", "GGGG"] {
        println!("K-mer '{}' found in datasets: {:?}", kmer, tree.query(kmer));
    }

    Ok(())
}
