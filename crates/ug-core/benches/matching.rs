use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ug_core::{AccessType, FixedRedirect, UrlGroup};

fn suffix_group(size: usize) -> UrlGroup {
    let mut group = UrlGroup::new(1, AccessType::Deny);
    for i in 0..size {
        group.add_url(&format!("host{i}.example.com")).unwrap();
    }
    group
}

fn regex_group(size: usize) -> UrlGroup {
    let mut group = UrlGroup::new(2, AccessType::Redir);
    for i in 0..size {
        group.add_url(&format!(r"http://ads{i}\.example\.com/.*")).unwrap();
    }
    group
}

fn bench_matching(c: &mut Criterion) {
    let deny = suffix_group(1_000);
    let redir = regex_group(100);
    let target = FixedRedirect("http://block.local/".to_string());

    c.bench_function("suffix_miss_1000", |b| {
        b.iter(|| deny.has_url(black_box("http://www.unlisted.org/index.html")))
    });

    c.bench_function("suffix_hit_last_1000", |b| {
        b.iter(|| deny.has_url(black_box("http://www.host999.example.com/")))
    });

    c.bench_function("regex_miss_100", |b| {
        b.iter(|| redir.has_url(black_box("http://www.unlisted.org/index.html")))
    });

    c.bench_function("regex_modify_hit_100", |b| {
        b.iter(|| redir.modify_url_with(black_box("http://ads99.example.com/banner.gif"), &target))
    });
}

criterion_group!(benches, bench_matching);
criterion_main!(benches);
