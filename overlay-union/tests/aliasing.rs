use overlay_core::Value;
use overlay_union::{UnionLayout, UnionType};

#[test]
fn int_bits_reinterpret_as_float() {
    overlay_testhelpers::setup();
    let u = UnionType::with_fields([("a", "int32"), ("c", "float")]).unwrap();
    let mut v = u.instance();
    // 1065353216 is the bit pattern of 1.0f32.
    v.set("a", Value::Int(1065353216)).unwrap();
    assert_eq!(v.get("c").unwrap(), Value::Float(1.0));
}

#[test]
fn all_bits_set_read_as_minus_one_through_either_member() {
    let u = UnionType::with_fields([("x", "int32"), ("y", "int32")]).unwrap();
    assert_eq!(
        u.layout(),
        UnionLayout {
            size: 4,
            alignment: 4
        }
    );
    let mut v = u.instance();
    v.set("x", Value::Int(-1)).unwrap();
    assert_eq!(v.get("y").unwrap(), Value::Int(-1));
    assert_eq!(v.buffer().to_vec(), vec![0xff; 4]);
}

#[test]
fn double_bits_read_back_through_uint64() {
    let u = UnionType::with_fields([("d", "double"), ("bits", "uint64")]).unwrap();
    let mut v = u.instance();
    v.set("d", Value::Float(-2.5)).unwrap();
    assert_eq!(v.get("bits").unwrap(), Value::UInt((-2.5f64).to_bits()));
}

#[test]
fn writes_through_one_member_clobber_the_previous_one() {
    let u = UnionType::with_fields([("a", "uint32"), ("b", "uint8")]).unwrap();
    let mut v = u.instance();
    v.set("a", Value::UInt(u32::MAX as u64)).unwrap();
    v.set("b", Value::UInt(0)).unwrap();
    // Only the byte `b` covers changed; the rest of `a` is untouched.
    let got = v.get("a").unwrap().as_u64().unwrap() as u32;
    assert_eq!(got, u32::from_ne_bytes({
        let mut raw = [0xff; 4];
        raw[0] = 0;
        raw
    }));
}
