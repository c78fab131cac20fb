use bhasha::config::FilterSettings;
use bhasha::filtering::Fingerprint;
use bhasha::identifiers::ScriptDetector;
use bhasha::lang::Language;
use bhasha::pipelines::{Document, DocumentFilter, RunContext};
use bhasha::transformers::TextCleaner;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const HINDI: &str = "भारत एक विशाल देश है। इसकी संस्कृति बहुत पुरानी है और यहाँ अनेक भाषाएँ बोली जाती हैं।
    अमेरिकी राष्ट्रपति चुनाव (US Presidential Election) की खबरें भी यहाँ पढ़ी जाती हैं।   ★ ✓ ";

pub fn detector_benchmark(c: &mut Criterion) {
    let text = HINDI.repeat(20);
    c.bench_function("detect (uncached)", |b| {
        b.iter(|| ScriptDetector::new(500, 0).detect(black_box(&text)))
    });
    let mut detector = ScriptDetector::default();
    c.bench_function("detect (cached)", |b| {
        b.iter(|| detector.detect(black_box(&text)))
    });
}

pub fn cleaner_benchmark(c: &mut Criterion) {
    let cleaner = TextCleaner::for_language(Language::Hindi);
    let text = HINDI.repeat(20);
    c.bench_function("clean", |b| b.iter(|| cleaner.clean(black_box(&text))));
}

pub fn fingerprint_benchmark(c: &mut Criterion) {
    let short = HINDI.to_string();
    let long = HINDI.repeat(200);
    c.bench_function("fingerprint (full)", |b| {
        b.iter(|| Fingerprint::sampled(black_box(&short), 5000, 1000))
    });
    c.bench_function("fingerprint (sampled)", |b| {
        b.iter(|| Fingerprint::sampled(black_box(&long), 5000, 1000))
    });
}

pub fn document_benchmark(c: &mut Criterion) {
    let settings = FilterSettings::default();
    let filter = DocumentFilter::new(Language::Hindi, &settings);
    let documents: Vec<Document> = (0..1000)
        .map(|i| Document::new(format!("{} {}", HINDI, i), "bench".to_string()))
        .collect();
    c.bench_function("examine 1000 documents", |b| {
        b.iter(|| {
            let mut ctx = RunContext::new(&settings);
            for document in &documents {
                black_box(filter.examine(&mut ctx, document));
            }
        })
    });
}

criterion_group!(
    benches,
    detector_benchmark,
    cleaner_benchmark,
    fingerprint_benchmark,
    document_benchmark
);
criterion_main!(benches);
