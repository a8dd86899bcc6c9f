use approx::assert_relative_eq;
use slmquote_core::{GeometryStats, ParameterSet, PreconditionError};
use slmquote_costing::simple::estimate;
use slmquote_costing::{ConfigSection, SimpleConfig, TimeSource};
use slmquote_mesh::analyze;
use slmquote_mesh::fixtures::cube_mesh;

fn cube_stats() -> GeometryStats {
    analyze(&cube_mesh())
}

#[test]
fn test_cube_with_defaults() {
    let quote = estimate(&cube_stats(), &SimpleConfig::default()).unwrap();
    assert_relative_eq!(quote.mass_kg, 0.00443, max_relative = 1e-9);
    assert_relative_eq!(quote.material_cost, 69.7725, max_relative = 1e-9);
    assert_relative_eq!(quote.processing_hours, 1.0 / 6.5, max_relative = 1e-9);
    assert_eq!(quote.time_source, TimeSource::Productivity);
    assert_relative_eq!(quote.machine_cost, 461.538461538, max_relative = 1e-9);
    assert_relative_eq!(quote.unit_price, 637.573153846, max_relative = 1e-9);
    assert_eq!(quote.line_total, quote.unit_price);
}

#[test]
fn test_zero_productivity_without_manual_time() {
    let params = ParameterSet::new().with("productivity", "0");
    let config = SimpleConfig::from_params(&params);
    let quote = estimate(&cube_stats(), &config).unwrap();

    assert_eq!(quote.processing_hours, 0.0);
    assert_eq!(quote.machine_cost, 0.0);
    assert_eq!(quote.time_source, TimeSource::Unavailable);
    assert_eq!(quote.unit_price, quote.material_cost * 1.2);
}

#[test]
fn test_manual_time_overrides_productivity() {
    let params = ParameterSet::new()
        .with("manual_time", "3")
        .with("machine_rate", "1000")
        .with("quantity", "5");
    let quote = estimate(&cube_stats(), &SimpleConfig::from_params(&params)).unwrap();
    assert_eq!(quote.processing_hours, 3.0);
    assert_eq!(quote.time_source, TimeSource::Manual);
    assert_eq!(quote.machine_cost, 3000.0);
    assert_eq!(quote.quantity, 5);
    assert_relative_eq!(quote.line_total, quote.unit_price * 5.0);
}

#[test]
fn test_empty_geometry_is_precondition_error() {
    assert_eq!(
        estimate(&GeometryStats::empty(), &SimpleConfig::default()),
        Err(PreconditionError::EmptyGeometry)
    );
}

#[test]
fn test_trace_lists_every_step() {
    let quote = estimate(&cube_stats(), &SimpleConfig::default()).unwrap();
    let trace = quote.trace();
    let labels: Vec<_> = trace.steps().iter().map(|s| s.label).collect();
    assert_eq!(
        labels,
        [
            "Volume",
            "Mass",
            "Material",
            "Processing time",
            "Machine",
            "Unit price",
            "Line total"
        ]
    );
    assert_eq!(trace.steps()[6].value, quote.line_total);

    let text = trace.to_string();
    assert_eq!(text.lines().count(), 7);
    assert!(text.contains("Mass: 1.000 cm³ × 4.43 g/cm³ / 1000 = 0.004 kg"));
}

#[test]
fn test_trace_is_rebuilt_identically() {
    let quote = estimate(&cube_stats(), &SimpleConfig::default()).unwrap();
    assert_eq!(quote.trace(), quote.trace());
}
