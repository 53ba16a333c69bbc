use test_strategy::proptest;

use super::{Address, Word, ROM_SIZE};
use crate::error::ConversionFailed;

#[test]
fn word_display_is_sixteen_binary_digits() {
    assert_eq!(Word::new(5).to_string(), "0000000000000101");
    assert_eq!(Word::ZERO.to_string(), "0000000000000000");
    assert_eq!(Word::new(0xFFFF).to_string(), "1111111111111111");
    assert_eq!(Word::new(0x8000).to_string(), "1000000000000000");
}

#[test]
fn word_bits() {
    let w = Word::new(0b1110_0000_0000_0001);
    assert!(w.bit(0));
    assert!(!w.bit(1));
    assert!(w.bit(13));
    assert!(w.bit(15));
}

#[test]
fn address_successor_does_not_wrap() {
    assert_eq!(Address::new(16).successor(), Some(Address::new(17)));
    assert_eq!(Address::new(0x7FFF).successor(), Some(Address::new(0x8000)));
    assert_eq!(Address::MAX.successor(), None);
}

#[test]
fn address_from_usize() {
    assert_eq!(Address::try_from(24576_usize), Ok(Address::new(24576)));
    assert_eq!(
        Address::try_from(usize::from(u16::MAX) + 1),
        Err(ConversionFailed::TooLarge)
    );
    // The last ROM slot is still addressable.
    assert!(Address::try_from(ROM_SIZE - 1).is_ok());
}

#[proptest]
fn word_display_round_trips_through_parse(w: Word) {
    let text = w.to_string();
    assert_eq!(text.len(), 16);
    assert_eq!(u16::from_str_radix(&text, 2), Ok(w.bits()));
}

#[proptest]
fn address_display_is_decimal(a: Address) {
    assert_eq!(a.to_string(), a.value().to_string());
}
