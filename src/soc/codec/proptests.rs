use proptest::prelude::*;

use super::{OverflowPolicy, Radix, decode, decode_field, encode, mask_bits};
use crate::soc::description::{Device, DeviceBuilder, PeripheralBuilder, Register, RegisterBuilder};

fn register_width() -> impl Strategy<Value = u32> {
    prop_oneof![Just(8u32), Just(16u32), Just(32u32), Just(64u32)]
}

/// Register width and one field `(offset, width)` inside it.
fn single_field() -> impl Strategy<Value = (u32, u32, u32)> {
    register_width()
        .prop_flat_map(|reg_width| (Just(reg_width), 0..reg_width))
        .prop_flat_map(|(reg_width, offset)| (Just(reg_width), Just(offset), 1..=reg_width - offset))
}

/// Register width and contiguous fields covering every one of its bits.
fn tiling() -> impl Strategy<Value = (u32, Vec<(u32, u32)>)> {
    register_width()
        .prop_flat_map(|reg_width| {
            (
                Just(reg_width),
                prop::collection::vec(any::<bool>(), (reg_width - 1) as usize),
            )
        })
        .prop_map(|(reg_width, cuts)| {
            let mut fields = Vec::new();
            let mut start = 0;
            for (bit, cut) in cuts.into_iter().enumerate() {
                if cut {
                    let end = bit as u32 + 1;
                    fields.push((start, end - start));
                    start = end;
                }
            }
            fields.push((start, reg_width - start));
            (reg_width, fields)
        })
}

fn device_with(reg_width: u32, fields: &[(u32, u32)]) -> Device {
    let mut register = RegisterBuilder::new("R", 0).width(reg_width);
    for (index, (offset, width)) in fields.iter().enumerate() {
        register.push_field(format!("F{index}"), *offset, *width);
    }
    DeviceBuilder::new("generated")
        .peripheral(PeripheralBuilder::new("P", 0).register(register))
        .finish()
        .expect("generated layout is valid")
}

fn only_register(device: &Device) -> &Register {
    &device.peripherals()[0].registers()[0]
}

proptest! {
    #[test]
    fn decoded_values_fit_their_width(
        (reg_width, offset, width) in single_field(),
        raw in any::<u64>(),
    ) {
        let device = device_with(reg_width, &[(offset, width)]);
        let reg = only_register(&device);
        let raw = raw & mask_bits(reg_width);
        let decoded = decode(raw, reg, Radix::Decimal, false).unwrap();
        let value = decoded.fields[0].value;
        prop_assert!(value <= mask_bits(width), "value {value:#x} exceeds {width} bits");
        prop_assert_eq!(value, (raw >> offset) & mask_bits(width));
    }

    #[test]
    fn tiled_fields_reconstruct_the_raw_word(
        (reg_width, fields) in tiling(),
        raw in any::<u64>(),
    ) {
        let device = device_with(reg_width, &fields);
        let reg = only_register(&device);
        let raw = raw & mask_bits(reg_width);
        let decoded = decode(raw, reg, Radix::Binary, false).unwrap();
        prop_assert_eq!(decoded.fields.len(), fields.len());
        prop_assert_eq!(decoded.covered_bits(), raw);
    }

    #[test]
    fn encode_reads_back_modulo_width_and_is_idempotent(
        (reg_width, offset, width) in single_field(),
        raw in any::<u64>(),
        value in any::<u64>(),
    ) {
        let device = device_with(reg_width, &[(offset, width)]);
        let reg = only_register(&device);
        let field = &reg.fields()[0];
        let raw = raw & mask_bits(reg_width);

        let encoded = encode(raw, reg, field, value, OverflowPolicy::Truncate).unwrap();
        let decoded = decode_field(encoded, reg, "F0", Radix::Hex, false).unwrap();
        prop_assert_eq!(decoded.value, value & mask_bits(width));
        prop_assert_eq!(encoded & !field.mask(), raw & !field.mask(), "bits outside the field moved");
        prop_assert_eq!(encoded & !mask_bits(reg_width), 0, "encode escaped the register");
        let again = encode(encoded, reg, field, value, OverflowPolicy::Truncate).unwrap();
        prop_assert_eq!(again, encoded);
    }

    #[test]
    fn fields_reaching_bit_63_round_trip(
        offset in 0u32..64,
        raw in any::<u64>(),
        value in any::<u64>(),
    ) {
        let width = 64 - offset;
        let device = device_with(64, &[(offset, width)]);
        let reg = only_register(&device);
        let field = &reg.fields()[0];

        let encoded = encode(raw, reg, field, value, OverflowPolicy::Truncate).unwrap();
        prop_assert_eq!(encoded >> offset, value & mask_bits(width));
        prop_assert_eq!(encoded & mask_bits(offset), raw & mask_bits(offset));

        let fits = value <= mask_bits(width);
        prop_assert_eq!(encode(raw, reg, field, value, OverflowPolicy::Reject).is_ok(), fits);
    }
}
