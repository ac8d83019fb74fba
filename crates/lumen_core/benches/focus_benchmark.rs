//! # Focus Navigation Benchmark
//!
//! Tab navigation runs on every key press, so cycling through a large form
//! must stay far below a frame budget.
//!
//! Run with: `cargo bench --package lumen_core`

// Benchmarks don't need strict docs
#![allow(missing_docs)]

use std::cell::RefCell;
use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use lumen_core::{FocusHandle, FocusLink, FocusManager, Focusable, Key, KeyEvent};

struct Field {
    index: i32,
    focused: bool,
    link: Option<FocusLink>,
}

impl Focusable for Field {
    fn tab_stop_index(&self) -> i32 {
        self.index
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn focus(&mut self) {
        if let Some(link) = &self.link {
            link.acquire(self.index);
        }
        self.focused = true;
    }

    fn lose_focus(&mut self) {
        self.focused = false;
        if let Some(link) = &self.link {
            link.release(self.index);
        }
    }

    fn set_focus_link(&mut self, link: Option<FocusLink>) {
        self.link = link;
    }
}

fn build_manager(count: i32) -> FocusManager {
    let mut manager = FocusManager::new();
    for index in 0..count {
        let field: FocusHandle = Rc::new(RefCell::new(Field {
            index: index * 2,
            focused: false,
            link: None,
        }));
        manager.register(field);
    }
    manager
}

/// Benchmark: Tab key cycling through forms of different sizes.
fn bench_tab_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("tab_cycle");
    let tab = KeyEvent::new(Key::Tab);

    for size in [8, 64, 512] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut manager = build_manager(size);
            b.iter(|| {
                black_box(manager.handle_key(black_box(&tab)));
            });
        });
    }

    group.finish();
}

/// Benchmark: Registering a full form.
fn bench_registration(c: &mut Criterion) {
    c.bench_function("register_64_fields", |b| {
        b.iter(|| black_box(build_manager(64)));
    });
}

criterion_group!(benches, bench_tab_cycle, bench_registration);
criterion_main!(benches);
