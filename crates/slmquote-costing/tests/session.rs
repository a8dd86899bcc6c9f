use slmquote_core::{MeshFormatError, PreconditionError};
use slmquote_costing::{PowderBedConfig, QuoteSession, SimpleConfig, DEFAULT_PART_NAME};
use slmquote_mesh::fixtures::{cube_binary, CUBE_ASCII};

#[test]
fn test_quotes_need_geometry() {
    let mut session = QuoteSession::new();
    assert!(session.geometry().is_none());
    assert_eq!(
        session.quote_powder_bed(&PowderBedConfig::default()),
        Err(PreconditionError::NoGeometry)
    );
    assert_eq!(
        session.quote_simple(&SimpleConfig::default()),
        Err(PreconditionError::NoGeometry)
    );
    assert_eq!(
        session.add_current_to_batch().map(|i| i.sequence),
        Err(PreconditionError::NoGeometry)
    );
}

#[test]
fn test_load_and_quote() {
    let mut session = QuoteSession::with_tariff(200.0);
    let stats = session.load_mesh("demo_cube_10mm.stl", &cube_binary()).unwrap();
    assert_eq!(stats.triangle_count, 12);
    assert_eq!(session.part_name(), "demo_cube_10mm");

    let breakdown = session.quote_powder_bed(&PowderBedConfig::default()).unwrap();
    assert!(breakdown.sell_price > breakdown.cost_price);
    assert!(session.quote_simple(&SimpleConfig::default()).is_ok());

    let item = session.add_current_to_batch().unwrap();
    assert_eq!(item.sequence, 1);
    assert_eq!(item.name, "demo_cube_10mm");
    assert_eq!(session.batch().len(), 1);
}

#[test]
fn test_failed_load_keeps_previous_geometry() {
    let mut session = QuoteSession::new();
    session.load_mesh_str("cube.stl", CUBE_ASCII).unwrap();
    let before = *session.geometry().unwrap();

    let err = session
        .load_mesh("broken.stl", b"solid x\nvertex 0 0 0\nendsolid x\n")
        .unwrap_err();
    assert_eq!(err, MeshFormatError::IncompleteTriangle { vertices: 1 });
    assert_eq!(session.geometry(), Some(&before));
    assert_eq!(session.part_name(), "cube");
}

#[test]
fn test_empty_binary_mesh_is_rejected_by_every_mode() {
    let mut session = QuoteSession::new();
    let mut empty = vec![0u8; 84];
    empty[..5].copy_from_slice(b"empty");
    let stats = session.load_mesh("empty.stl", &empty).unwrap();
    assert!(stats.bounding_box.is_none());

    assert_eq!(
        session.quote_powder_bed(&PowderBedConfig::default()),
        Err(PreconditionError::EmptyGeometry)
    );
    assert_eq!(
        session.quote_simple(&SimpleConfig::default()),
        Err(PreconditionError::EmptyGeometry)
    );
    assert_eq!(
        session.add_current_to_batch().map(|i| i.sequence),
        Err(PreconditionError::EmptyGeometry)
    );
}

#[test]
fn test_clear_geometry_keeps_batch() {
    let mut session = QuoteSession::new();
    session.load_mesh_str("cube.stl", CUBE_ASCII).unwrap();
    session.add_current_to_batch().unwrap();
    session.clear_geometry();
    assert!(session.geometry().is_none());
    assert_eq!(session.part_name(), DEFAULT_PART_NAME);
    assert_eq!(session.batch().len(), 1);

    session.batch_mut().set_tariff(5.0);
    assert_eq!(session.batch().tariff(), 5.0);
}
