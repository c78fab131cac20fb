use std::fs::File;
use std::io::Write;
use std::path::Path;

use bhasha::config::{CollectionConfig, DatasetSource, FilterSettings, LanguageSettings};
use bhasha::io::CorpusWriter;
use bhasha::lang::Language;
use bhasha::pipelines::{
    CollectionReport, CollectionStatus, Collector, LanguageStats, Pipeline, SourceOutcome,
};
use bhasha::sources::LocalClient;
use flate2::write::GzEncoder;
use flate2::Compression;

fn english_texts(nb: usize) -> Vec<String> {
    (0..nb)
        .map(|x| format!("This is english document number {} with enough words inside.", x + 1))
        .collect()
}

fn hindi_texts(nb: usize) -> Vec<String> {
    (0..nb)
        .map(|x| format!("यह हिंदी दस्तावेज़ संख्या {} है और इसमें पर्याप्त शब्द हैं।", x + 1))
        .collect()
}

fn sanskrit_texts(nb: usize) -> Vec<String> {
    (0..nb)
        .map(|x| format!("इदं संस्कृतस्य {} लेखनम् अस्ति बहूनि पदानि च॥", x + 1))
        .collect()
}

fn write_jsonl(path: &Path, texts: &[String]) {
    let lines: Vec<String> = texts
        .iter()
        .map(|t| serde_json::json!({ "text": t }).to_string())
        .collect();
    std::fs::write(path, lines.join("\n")).unwrap();
}

fn write_jsonl_gz(path: &Path, texts: &[String]) {
    let mut enc = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    for t in texts {
        writeln!(enc, "{}", serde_json::json!({ "content": t })).unwrap();
    }
    enc.finish().unwrap();
}

fn settings(language: Language, budget: u64, sources: Vec<DatasetSource>) -> LanguageSettings {
    LanguageSettings {
        language,
        share: None,
        budget: Some(budget),
        sources,
    }
}

#[test]
fn collect_local() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();

    std::fs::create_dir(src.path().join("en")).unwrap();
    write_jsonl(&src.path().join("en/part-0.jsonl"), &english_texts(50));

    // first hindi source is mostly english and has duplicates
    let mut mixed = english_texts(5);
    mixed.extend(hindi_texts(5));
    mixed.extend(hindi_texts(5));
    write_jsonl(&src.path().join("hi_mixed.jsonl"), &mixed);
    write_jsonl_gz(&src.path().join("hi_more.jsonl.gz"), &hindi_texts(20));

    write_jsonl(&src.path().join("sa.jsonl"), &sanskrit_texts(4));

    let config = CollectionConfig {
        target_tokens: 1000,
        languages: vec![
            // 10 words: 13 tokens per document
            settings(
                Language::English,
                100,
                vec![DatasetSource::new("en/*.jsonl")],
            ),
            settings(
                Language::Hindi,
                10_000,
                vec![
                    DatasetSource::new("missing/*.jsonl"),
                    DatasetSource::new("hi_mixed.jsonl"),
                    DatasetSource::new("hi_more.jsonl.gz").with_text_field("content"),
                ],
            ),
            settings(Language::Sanskrit, 10_000, vec![DatasetSource::new("sa.jsonl")]),
        ],
        filters: FilterSettings::default(),
    };

    let result = Collector::from_config(LocalClient::new(src.path()), &config)
        .unwrap()
        .run()
        .unwrap();
    let report = &result.report;

    let english = report.language(Language::English).unwrap();
    assert_eq!(english.status, CollectionStatus::BudgetMet);
    assert_eq!(english.documents_accepted, 8);
    assert_eq!(english.estimated_tokens, 104);

    let hindi = report.language(Language::Hindi).unwrap();
    assert_eq!(hindi.status, CollectionStatus::SourcesExhausted);
    assert_eq!(hindi.sources[0].outcome, SourceOutcome::Unavailable);
    assert_eq!(hindi.rejected.language_mismatch, 5);
    // 5 duplicates within the mixed source, 5 more in the gzipped one
    assert_eq!(hindi.rejected.duplicate, 10);
    assert_eq!(hindi.documents_accepted, 20);
    assert!(hindi.shortfall > 0);

    let sanskrit = report.language(Language::Sanskrit).unwrap();
    assert_eq!(sanskrit.status, CollectionStatus::SourcesExhausted);
    assert_eq!(sanskrit.documents_accepted, 4);

    assert_eq!(
        report.total_tokens,
        english.estimated_tokens + hindi.estimated_tokens + sanskrit.estimated_tokens
    );

    CorpusWriter::new(dst.path()).write(&result).unwrap();

    let english_txt = std::fs::read_to_string(dst.path().join("english/english.txt")).unwrap();
    let documents: Vec<&str> = english_txt.split("\n\n").filter(|d| !d.is_empty()).collect();
    assert_eq!(documents.len(), 8);
    assert_eq!(
        documents[0],
        "This is english document number 1 with enough words inside."
    );

    let stats: LanguageStats = serde_json::from_reader(
        File::open(dst.path().join("hindi/hindi_stats.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(&stats, hindi);

    let written: CollectionReport =
        serde_json::from_reader(File::open(dst.path().join("collection_report.json")).unwrap())
            .unwrap();
    assert_eq!(written.total_tokens, report.total_tokens);
    assert_eq!(written.languages, report.languages);
    let share_sum: f64 = written.shares.values().sum();
    assert!((share_sum - 1.0).abs() < 1e-9);
}

#[test]
fn broken_lines_are_skipped() {
    let src = tempfile::tempdir().unwrap();
    let texts = english_texts(7);
    let mut first: Vec<String> = vec![serde_json::json!({ "text": texts[0] }).to_string()];
    first.push("{not json".to_string());
    first.extend(
        texts[1..6]
            .iter()
            .map(|t| serde_json::json!({ "text": t }).to_string()),
    );
    std::fs::write(src.path().join("a.jsonl"), first.join("\n")).unwrap();
    write_jsonl(&src.path().join("b.jsonl"), &texts[6..]);

    let config = CollectionConfig {
        target_tokens: 1000,
        languages: vec![settings(
            Language::English,
            1000,
            vec![DatasetSource::new("*.jsonl")],
        )],
        filters: FilterSettings::default(),
    };
    let result = Collector::from_config(LocalClient::new(src.path()), &config)
        .unwrap()
        .run()
        .unwrap();

    let english = result.report.language(Language::English).unwrap();
    assert_eq!(english.documents_accepted, 7);
    assert_eq!(english.rejected.malformed, 1);
    assert_eq!(english.sources[0].outcome, SourceOutcome::Exhausted);
}

#[test]
fn config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "target_tokens": 2000,
            "languages": [
                {"language": "sa", "sources": [{"dataset": "sa/*.jsonl"}]},
                {"language": "hindi", "share": 0.5, "sources": [{"dataset": "hi/*.jsonl", "text_field": "body"}]}
            ]
        }"#,
    )
    .unwrap();

    let config = CollectionConfig::from_path(&path).unwrap();
    let targets = config.targets().unwrap();
    assert_eq!(targets[0].budget, 300);
    assert_eq!(targets[1].budget, 1000);
    assert_eq!(targets[1].sources[0].text_field, "body");
}
