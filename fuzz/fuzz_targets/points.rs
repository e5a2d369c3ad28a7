#![no_main]
use libfuzzer_sys::fuzz_target;
use sm2_core::{AffinePoint, BigUint, CurveParams, FixedBaseMul, PrecomputedTable};

fn test_group(curve: &CurveParams, p1: &AffinePoint, p2: &AffinePoint, s: &BigUint) {
    // Closure
    let sum = curve.add(p1, p2);
    assert!(curve.is_on_curve(&sum));

    // Test that addition and doubling are consistent
    assert_eq!(curve.double(p1), curve.add(p1, p1));

    // Test that negation works correctly
    assert!(curve.add(&sum, &curve.negate(&sum)).is_identity());

    // Test scalar multiplication distributive property
    let scalar_mul = curve.mul(s, p1);
    assert_eq!(
        curve.add(&scalar_mul, &scalar_mul),
        curve.mul(&(s + s), p1)
    );
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 96 {
        return;
    }

    let curve = CurveParams::sm2();
    let k1 = BigUint::from_bytes_be(&data[0..32]);
    let k2 = BigUint::from_bytes_be(&data[32..64]);
    let s = BigUint::from_bytes_be(&data[64..96]);

    let p1 = curve.mul_by_generator(&k1);
    let p2 = curve.mul_by_generator(&k2);
    test_group(curve, &p1, &p2, &s);

    // [k1]G + [k2]G = [k1 + k2]G
    assert_eq!(curve.add(&p1, &p2), curve.mul_by_generator(&(&k1 + &k2)));

    // Every eighth input also checks the fixed-base table
    if data[95] & 7 == 0 {
        let table = PrecomputedTable::new(curve, &p1);
        assert_eq!(table.mul_base(&s), curve.mul(&s, &p1));
    }
});
