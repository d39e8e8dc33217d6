use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tiden_core::{ChartConfig, SceneSurface, Table, TidenChart, Viewport};

fn build_table(series: usize, years: usize) -> Table {
    let mut columns = vec!["name".to_string()];
    columns.extend((0..years).map(|y| format!("{}-01-01", 1900 + y)));
    let mut table = Table::new(columns);
    for s in 0..series {
        let mut row = vec![format!("gauge{s}")];
        for y in 0..years {
            let v = 400.0 + (y as f64 * 0.17 + s as f64 * 0.9).cos() * 35.0;
            row.push(format!("{v:.0}"));
        }
        table = table.with_row(row);
    }
    table
}

fn bench_redraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("redraw");
    for &series in &[4usize, 10] {
        let mut chart = TidenChart::new(SceneSurface::new(), ChartConfig::default());
        chart.init(Viewport::new(900.0, 700.0));
        if chart.finish_load(Ok(build_table(series, 120))).is_err() {
            continue;
        }
        group.bench_function(format!("resize_redraw_{series}"), |b| {
            let mut wide = false;
            b.iter(|| {
                wide = !wide;
                chart.handle_resize(Viewport::new(if wide { 1200.0 } else { 900.0 }, 700.0));
                black_box(chart.renderer().cell_count());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_redraw);
criterion_main!(benches);
