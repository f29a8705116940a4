//! Benchmarks for board mutations that move many handles.
//!
//! These benchmarks measure removing a task from the top of a long list,
//! which shifts every later row and the notes pinned to them, and running a
//! full erase animation to completion.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use notepad_tui::canvas::{Board, Viewport};

fn board_with_tasks(count: usize, pinned_notes: usize) -> Board {
    let mut board = Board::new(
        Viewport {
            width: 200,
            height: 400,
        },
        false,
    );
    for i in 0..count {
        board.append_task(&format!("Task {} with some text to draw", i), false, (i % 4) as u8);
    }
    for i in 0..pinned_notes {
        board.create_preview(&format!("Note {}", i), (i % 4) as u8);
        board.commit_placement(120, (i * 6) as i32);
    }
    board.settle();
    let ids: Vec<_> = board.postits().iter().map(|note| note.id).collect();
    for id in ids {
        let _ = board.toggle_pin(id);
    }
    board
}

fn bench_remove_first_task(c: &mut Criterion) {
    c.bench_function("remove_first_of_100_tasks", |b| {
        b.iter_batched(
            || board_with_tasks(100, 10),
            |mut board| {
                let first = board.tasks().iter().next().map(|task| task.id);
                if let Some(id) = first {
                    let _ = board.remove_task(black_box(id));
                }
                board
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_erase_to_completion(c: &mut Criterion) {
    c.bench_function("erase_task_to_completion", |b| {
        b.iter_batched(
            || board_with_tasks(20, 0),
            |mut board| {
                let first = board.tasks().iter().next().map(|task| task.id);
                if let Some(id) = first {
                    let _ = board.toggle_task(id);
                }
                board.settle()
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_remove_first_task, bench_erase_to_completion);
criterion_main!(benches);
