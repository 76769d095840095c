//! End-to-end tests for the vectorize and index stages
//!
//! Each test builds a small wiki in a temp folder, runs the stages through
//! the feature snapshot and checks the resulting labels and index.

use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;
use wikidex::{
    cluster::{cluster_table, ClusterOptions, LinkageMethod, OUTLIER_LABEL},
    index::RenderOptions,
    parser::read_documents,
    pipeline::{index_from_features, vectorize_wiki},
    FeatureTable, Featurizer, WikidexError,
};

fn write_wiki(dir: &Path, pages: &[(&str, &str)]) {
    for (name, content) in pages {
        std::fs::write(dir.join(name), content).unwrap();
    }
}

/// a -> b, b -> c, c has no links, no shared terms
fn chain_wiki(dir: &Path) {
    write_wiki(
        dir,
        &[
            ("a.md", "# Apples\n\nOrchards produce [crisp fruit](b.md).\n"),
            ("b.md", "# Bicycles\n\nSpokes carry [wheels](c.md).\n"),
            ("c.md", "# Clouds\n\nThunderstorms gather overhead.\n"),
        ],
    );
}

fn options(thresholds: Vec<f64>) -> ClusterOptions {
    ClusterOptions {
        method: LinkageMethod::Ward,
        thresholds,
        min_cluster_size: None,
    }
}

#[test]
fn test_chain_scenario_vectors() {
    let wiki = TempDir::new().unwrap();
    chain_wiki(wiki.path());

    let report = read_documents(wiki.path()).unwrap();
    let featurizer = Featurizer::fit(&report.documents).unwrap();
    assert_eq!(featurizer.vocabulary.iter().collect::<Vec<_>>(), vec!["b.md", "c.md"]);

    let table = featurizer.vectorize_corpus(&report.documents).unwrap();
    let prefixes: Vec<Vec<f64>> = table.rows().iter().map(|r| r.values[..2].to_vec()).collect();
    assert_eq!(prefixes, vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 0.0]]);
}

#[test]
fn test_chain_scenario_coarse_and_fine_cuts() {
    let wiki = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    chain_wiki(wiki.path());
    let features = out.path().join("featurized_text.tsv");

    let vectorized = vectorize_wiki(wiki.path(), &features).unwrap();
    assert_eq!(vectorized.rows, 3);
    assert!(vectorized.skipped.is_empty());

    let table = FeatureTable::load(&features).unwrap();
    let (_, levels) = cluster_table(&table, &options(vec![10.0, 0.01])).unwrap();
    assert_eq!(levels.level(0).unwrap(), &[1, 1, 1]);
    assert_eq!(levels.level(1).unwrap(), &[1, 2, 3]);
}

#[test]
fn test_clustering_is_repeatable() {
    let wiki = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    chain_wiki(wiki.path());
    write_wiki(
        wiki.path(),
        &[("d.md", "Orchards and fruit again, see [more](b.md).\n")],
    );
    let features = out.path().join("features.tsv");
    vectorize_wiki(wiki.path(), &features).unwrap();

    let table = FeatureTable::load(&features).unwrap();
    let opts = ClusterOptions::default();
    let (first_linkage, first) = cluster_table(&table, &opts).unwrap();
    let (second_linkage, second) = cluster_table(&table, &opts).unwrap();
    assert_eq!(first, second);
    assert_eq!(first_linkage, second_linkage);
}

#[test]
fn test_single_document_is_insufficient() {
    let wiki = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_wiki(wiki.path(), &[("only.md", "A lonely page about lighthouses.\n")]);
    let features = out.path().join("features.tsv");

    vectorize_wiki(wiki.path(), &features).unwrap();
    let err = index_from_features(&features, &options(vec![1.0]), 0, &RenderOptions::default())
        .unwrap_err();
    assert!(matches!(err, WikidexError::InsufficientData { found: 1 }));
}

#[test]
fn test_empty_wiki_is_empty_corpus() {
    let wiki = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let err = vectorize_wiki(wiki.path(), &out.path().join("features.tsv")).unwrap_err();
    assert!(matches!(err, WikidexError::EmptyCorpus(_)));
}

#[test]
fn test_unreadable_page_is_skipped() {
    let wiki = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    chain_wiki(wiki.path());
    std::fs::write(wiki.path().join("broken.md"), [0xc3, 0x28, 0xa0]).unwrap();

    let report = vectorize_wiki(wiki.path(), &out.path().join("features.tsv")).unwrap();
    assert_eq!(report.documents, 3);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].ends_with("broken.md"));
}

#[test]
fn test_rendered_index() {
    let wiki = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    chain_wiki(wiki.path());
    let features = out.path().join("features.tsv");
    vectorize_wiki(wiki.path(), &features).unwrap();

    let render = RenderOptions {
        title: "My Wiki".to_string(),
        subtitle: "Grouped pages".to_string(),
    };
    let report = index_from_features(&features, &options(vec![10.0]), 0, &render).unwrap();
    assert_eq!(
        report.markdown,
        "# My Wiki\n\nGrouped pages\n\n## Cluster 1\n\n  - [[a]]\n  - [[b]]\n  - [[c]]\n"
    );
}

#[test]
fn test_outliers_rendered_as_unclustered() {
    let wiki = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    chain_wiki(wiki.path());
    let features = out.path().join("features.tsv");
    vectorize_wiki(wiki.path(), &features).unwrap();

    let opts = ClusterOptions {
        min_cluster_size: Some(2),
        ..options(vec![0.01])
    };
    let report = index_from_features(&features, &opts, 0, &RenderOptions::default()).unwrap();
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].label, OUTLIER_LABEL);
    assert!(report.markdown.contains("## Unclustered"));
}

#[test]
fn test_invalid_level() {
    let wiki = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    chain_wiki(wiki.path());
    let features = out.path().join("features.tsv");
    vectorize_wiki(wiki.path(), &features).unwrap();

    let err = index_from_features(&features, &options(vec![1.0]), 4, &RenderOptions::default())
        .unwrap_err();
    assert!(matches!(err, WikidexError::InvalidLevel { level: 4, levels: 1 }));
}
