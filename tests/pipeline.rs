use std::path::Path;

use abe_bench_plot::config::PlotConfig;
use abe_bench_plot::plot::backend::RecordingBackend;
use abe_bench_plot::{
    BenchmarkPlotter, ErrorPolicy, PlotError, PlotJob, PlotSpec, default_jobs, run,
};

const SETUP: &str = "Attributes,Time(ms)\n1,10\n2,20\n4,40\n";
const KEYGEN: &str = "NodesRequired,Time(ms)\n1,0.7\n2,1.0\n3,1.3\n";
const ENCRYPT: &str = "Benchmark,Attributes,Time(ms)\nenc-0,0,1.5\nenc-1,1,1.9\n";
const DECRYPT: &str = "NodesRequired,Time(ms)\n1,2.9\n2,4.0\n";

fn write_inputs(dir: &Path) {
    for (name, body) in [
        ("ABE_Setup_Runtime.csv", SETUP),
        ("ABE_Keygen_Runtime.csv", KEYGEN),
        ("ABE_Encryption_Runtime.csv", ENCRYPT),
        ("ABE_Decryption_Runtime.csv", DECRYPT),
    ] {
        std::fs::write(dir.join(name), body).unwrap();
    }
}

/// The built-in table, pointed at CSV copies of the inputs.
fn csv_jobs() -> Vec<PlotJob> {
    let mut jobs = default_jobs();
    for job in &mut jobs {
        job.source.set_extension("csv");
    }
    jobs
}

#[test]
fn four_phases_render_four_figures_in_order() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let mut plotter = BenchmarkPlotter::new(RecordingBackend::default());
    let report = run(&csv_jobs(), dir.path(), &mut plotter, ErrorPolicy::Continue);

    assert!(report.is_success());
    assert_eq!(report.rendered(), 4);

    let backend = plotter.into_backend();
    assert_eq!(
        backend.titles(),
        [
            "ABE Setup runtime",
            "ABE Keygen runtime",
            "ABE Encrypt runtime",
            "ABE Decrypt runtime"
        ]
    );

    let setup = &backend.figures[0];
    assert_eq!(setup.y_column, "Attributes");
    let xs: Vec<f64> = setup.display.iter().map(|p| p.0).collect();
    for (got, want) in xs.iter().zip([10f64.log2(), 20f64.log2(), 40f64.log2()]) {
        assert!((got - want).abs() < 1e-12);
    }

    // Linear axes leave the data untouched.
    let keygen = &backend.figures[1];
    assert_eq!(keygen.display, keygen.points);
    assert_eq!(keygen.points, [(0.7, 1.0), (1.0, 2.0), (1.3, 3.0)]);
}

#[test]
fn one_missing_file_does_not_stop_the_others() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    std::fs::remove_file(dir.path().join("ABE_Keygen_Runtime.csv")).unwrap();

    let mut plotter = BenchmarkPlotter::new(RecordingBackend::default());
    let report = run(&csv_jobs(), dir.path(), &mut plotter, ErrorPolicy::Continue);

    assert_eq!(report.rendered(), 3);
    assert_eq!(report.failed(), 1);
    let (outcome, err) = report.errors().next().unwrap();
    assert_eq!(outcome.title, "ABE Keygen runtime");
    assert!(matches!(err, PlotError::DataSource { .. }), "{err}");
    assert_eq!(
        plotter.backend().titles(),
        ["ABE Setup runtime", "ABE Encrypt runtime", "ABE Decrypt runtime"]
    );
}

#[test]
fn fail_fast_stops_at_first_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    // Keygen table without the column its plot needs.
    std::fs::write(
        dir.path().join("ABE_Keygen_Runtime.csv"),
        "Nodes,Time(ms)\n1,0.7\n",
    )
    .unwrap();

    let mut plotter = BenchmarkPlotter::new(RecordingBackend::default());
    let report = run(&csv_jobs(), dir.path(), &mut plotter, ErrorPolicy::FailFast);

    assert_eq!(report.outcomes.len(), 2);
    assert!(matches!(
        report.outcomes[1].result,
        Err(PlotError::ColumnNotFound { ref column, .. }) if column == "NodesRequired"
    ));
    assert_eq!(plotter.backend().titles(), ["ABE Setup runtime"]);
}

#[test]
fn header_only_table_is_reported_empty() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    std::fs::write(
        dir.path().join("ABE_Decryption_Runtime.csv"),
        "NodesRequired,Time(ms)\n",
    )
    .unwrap();

    let mut plotter = BenchmarkPlotter::new(RecordingBackend::default());
    let report = run(&csv_jobs(), dir.path(), &mut plotter, ErrorPolicy::Continue);

    assert!(matches!(
        report.outcomes[3].result,
        Err(PlotError::EmptyDataset { .. })
    ));
    assert_eq!(plotter.backend().figures.len(), 3);
}

#[test]
fn config_file_drives_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let config_path = dir.path().join("plots.json");
    let json = PlotConfig::from_jobs(&csv_jobs()[2..]).to_json_pretty().unwrap();
    std::fs::write(&config_path, json).unwrap();

    let jobs = PlotConfig::load(&config_path).unwrap().to_jobs().unwrap();
    let mut plotter = BenchmarkPlotter::new(RecordingBackend::default());
    let report = run(&jobs, dir.path(), &mut plotter, ErrorPolicy::Continue);

    assert!(report.is_success());
    assert_eq!(
        plotter.backend().titles(),
        ["ABE Encrypt runtime", "ABE Decrypt runtime"]
    );
}

#[test]
fn rerunning_gives_identical_figures() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let mut first = BenchmarkPlotter::new(RecordingBackend::default());
    let mut second = BenchmarkPlotter::new(RecordingBackend::default());
    run(&csv_jobs(), dir.path(), &mut first, ErrorPolicy::Continue);
    run(&csv_jobs(), dir.path(), &mut second, ErrorPolicy::Continue);

    assert_eq!(first.backend().figures, second.backend().figures);
}

#[test]
fn infinite_timings_are_masked_not_drawn() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    std::fs::write(
        dir.path().join("ABE_Setup_Runtime.csv"),
        "Attributes,Time(ms)\n1,10\n2,inf\n4,40\n8,-inf\n",
    )
    .unwrap();

    let mut plotter = BenchmarkPlotter::new(RecordingBackend::default());
    let report = run(&csv_jobs(), dir.path(), &mut plotter, ErrorPolicy::Continue);

    assert!(report.is_success());
    let setup = &plotter.backend().figures[0];
    assert_eq!(setup.points, [(10.0, 1.0), (40.0, 4.0)]);
    assert_eq!(setup.masked, 2);
    let (x, y) = (setup.x_range(), setup.y_range());
    assert!(x.start.is_finite() && x.end.is_finite(), "{x:?}");
    assert!(y.start.is_finite() && y.end.is_finite(), "{y:?}");
}

#[test]
fn column_spanning_all_of_f64_is_rejected_before_drawing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("extreme.csv"),
        "Attributes,Time(ms)\n1,-1e308\n2,1e308\n",
    )
    .unwrap();
    let jobs = [
        PlotJob::new("extreme.csv", "Time(ms)", "Attributes", PlotSpec::new("Extreme")),
        PlotJob::new("extreme.csv", "Attributes", "Attributes", PlotSpec::new("Sane")),
    ];

    let mut plotter = BenchmarkPlotter::new(RecordingBackend::default());
    let report = run(&jobs, dir.path(), &mut plotter, ErrorPolicy::Continue);

    assert_eq!(report.failed(), 1);
    let (outcome, err) = report.errors().next().unwrap();
    assert_eq!(outcome.title, "Extreme");
    assert!(matches!(err, PlotError::InvalidStyle(_)), "{err}");
    assert_eq!(plotter.backend().titles(), ["Sane"]);
}
