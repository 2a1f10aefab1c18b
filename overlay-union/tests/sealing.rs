use overlay_core::Buffer;
use overlay_union::{NameProblem, UnionError, UnionType};

#[test]
fn first_instance_freezes_the_field_set() {
    overlay_testhelpers::setup();
    let u = UnionType::with_fields([("x", "int32")]).unwrap();
    assert!(!u.is_sealed());
    let _instance = u.instance();
    assert!(u.is_sealed());

    let before = u.layout();
    let err = u.register_field("y", "double").unwrap_err();
    assert_eq!(err, UnionError::AlreadyFinalized { field: "y".into() });
    assert_eq!(u.layout(), before);
    assert_eq!(u.field_names(), ["x"]);
}

#[test]
fn adopting_an_external_buffer_also_seals() {
    let u = UnionType::with_fields([("x", "int32")]).unwrap();
    let _instance = u.instance_in(Buffer::alloc(4)).unwrap();
    assert!(u.is_sealed());
}

#[test]
fn failed_construction_does_not_seal() {
    let u = UnionType::with_fields([("x", "int64")]).unwrap();
    let err = u.instance_in(Buffer::alloc(4)).unwrap_err();
    assert_eq!(
        err,
        UnionError::BufferTooSmall {
            required: 8,
            actual: 4
        }
    );
    assert!(!u.is_sealed());
    u.register_field("y", "int8").unwrap();
}

#[test]
fn reserved_duplicate_and_empty_names_are_rejected() {
    let u = UnionType::with_fields([("val", "int32")]).unwrap();
    let before = u.layout();

    for reserved in ["ref", "buffer"] {
        let err = u.register_field(reserved, "int32").unwrap_err();
        assert_eq!(
            err,
            UnionError::InvalidName {
                name: reserved.into(),
                problem: NameProblem::Reserved
            }
        );
    }

    let err = u.register_field("val", "double").unwrap_err();
    assert_eq!(
        err,
        UnionError::InvalidName {
            name: "val".into(),
            problem: NameProblem::Duplicate
        }
    );

    let err = u.register_field("", "int32").unwrap_err();
    assert_eq!(
        err,
        UnionError::InvalidName {
            name: String::new(),
            problem: NameProblem::Empty
        }
    );

    assert_eq!(u.layout(), before);
    assert_eq!(u.field_count(), 1);
}
