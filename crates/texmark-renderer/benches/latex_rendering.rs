//! Benchmarks for markdown to LaTeX rendering.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use texmark_renderer::{MarkdownRenderer, RendererConfig, escape_latex};

/// Generate markdown content with specified structure.
fn generate_markdown(sections: usize, paragraphs_per_section: usize) -> String {
    let mut md = String::with_capacity(sections * 300 + sections * paragraphs_per_section * 200);
    md.push_str("# Document Title\n\n");

    for i in 0..sections {
        md.push_str(&format!("## Section {i}\n\n"));
        for j in 0..paragraphs_per_section {
            md.push_str(&format!(
                "Paragraph {j} in section {i} costs $5 & has 100% **bold**, *italic* and `code_span`.\n\n"
            ));
        }
        md.push_str("- first\n- second\n\n");
        md.push_str("| Key | Value |\n|:----|------:|\n| a_b | 1 |\n| c#d | 2 |\n\n");
    }
    md
}

fn bench_render_simple(c: &mut Criterion) {
    let renderer = MarkdownRenderer::new(RendererConfig::new("Title", "Author"));

    c.bench_function("render_simple_markdown", |b| {
        b.iter(|| renderer.render_markdown("# Hello\n\nSimple content."));
    });
}

fn bench_render_varying_sizes(c: &mut Criterion) {
    let renderer = MarkdownRenderer::new(RendererConfig::new("Title", "Author"));

    let mut group = c.benchmark_group("render_by_size");

    for (sections, paragraphs) in [(5, 2), (20, 3), (50, 5)] {
        let markdown = generate_markdown(sections, paragraphs);

        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("markdown", format!("{sections}s_{paragraphs}p")),
            &markdown,
            |b, markdown| b.iter(|| renderer.render_markdown(markdown)),
        );
    }

    group.finish();
}

fn bench_escape(c: &mut Criterion) {
    let plain = "Lorem ipsum dolor sit amet ".repeat(100);
    let reserved = "a_b{c}%d$e&f\\g~h#i ".repeat(100);

    let mut group = c.benchmark_group("escape_latex");
    group.bench_function("plain", |b| b.iter(|| escape_latex(&plain)));
    group.bench_function("reserved", |b| b.iter(|| escape_latex(&reserved)));
    group.finish();
}

criterion_group!(
    benches,
    bench_render_simple,
    bench_render_varying_sizes,
    bench_escape
);
criterion_main!(benches);
