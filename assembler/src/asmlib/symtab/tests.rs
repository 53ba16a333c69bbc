use std::collections::HashSet;

use test_strategy::proptest;

use super::*;

#[test]
fn predefined_symbols_have_fixed_addresses() {
    let mut symtab = SymbolTable::new();
    let size_before = symtab.len();
    for (name, expected) in [
        ("R0", 0_u16),
        ("R1", 1),
        ("R9", 9),
        ("R15", 15),
        ("SCREEN", 16384),
        ("KBD", 24576),
        ("SP", 0),
        ("LCL", 1),
        ("ARG", 2),
        ("THIS", 3),
        ("THAT", 4),
    ] {
        assert_eq!(symtab.resolve(name), Some(Address::new(expected)), "{name}");
        assert!(symtab.is_predefined(name));
    }
    assert_eq!(symtab.len(), size_before);
    assert_eq!(symtab.next_variable_address(), Address::new(16));
    assert_eq!(symtab.user_symbols().count(), 0);
}

#[test]
fn variables_are_allocated_in_order_of_first_reference() {
    let mut symtab = SymbolTable::new();
    assert_eq!(symtab.resolve("zebra"), Some(Address::new(16)));
    assert_eq!(symtab.resolve("apple"), Some(Address::new(17)));
    assert_eq!(symtab.resolve("zebra"), Some(Address::new(16)));
    assert_eq!(symtab.resolve("mango"), Some(Address::new(18)));
    assert_eq!(symtab.kind("apple"), Some(SymbolKind::Variable));

    let listed: Vec<(&str, u16)> = symtab
        .user_symbols()
        .map(|(name, address, _)| (name.as_str(), address.value()))
        .collect();
    assert_eq!(listed, vec![("zebra", 16), ("apple", 17), ("mango", 18)]);
}

/// A distinct letters-only name for each `n`.
fn variable_name(n: usize) -> String {
    let mut n = n;
    let mut name = String::new();
    loop {
        name.push(char::from(b'a' + u8::try_from(n % 26).unwrap()));
        n /= 26;
        if n == 0 {
            return name;
        }
    }
}

#[test]
fn variable_allocation_stops_at_the_last_addressable_register() {
    let mut symtab = SymbolTable::new();
    let capacity = usize::from(Operand::MAX.value()) + 1 - 16;
    for n in 0..capacity {
        let expected = Address::try_from(16 + n).unwrap();
        assert_eq!(symtab.resolve(&variable_name(n)), Some(expected));
    }
    assert_eq!(symtab.next_variable_address(), Address::new(0x8000));

    let overflow = variable_name(capacity);
    assert_eq!(symtab.resolve(&overflow), None);
    assert_eq!(symtab.resolve(&overflow), None);
    // Nothing was bound, and the allocator did not wrap around.
    assert_eq!(symtab.lookup(&overflow), None);
    assert_eq!(symtab.next_variable_address(), Address::new(0x8000));
    assert_eq!(symtab.user_symbols().count(), capacity);
    // Known names still resolve.
    assert_eq!(symtab.resolve(&variable_name(0)), Some(Address::new(16)));
    assert_eq!(symtab.resolve("R0"), Some(Address::new(0)));
}

#[test]
fn symbol_names_are_case_sensitive() {
    let mut symtab = SymbolTable::new();
    assert_eq!(symtab.resolve("sp"), Some(Address::new(16)));
    assert_eq!(symtab.resolve("SP"), Some(Address::new(0)));
}

#[test]
fn lookup_does_not_allocate() {
    let mut symtab = SymbolTable::new();
    assert_eq!(symtab.lookup("counter"), None);
    assert_eq!(symtab.lookup("counter"), None);
    assert_eq!(symtab.resolve("counter"), Some(Address::new(16)));
    assert_eq!(symtab.lookup("counter"), Some(Address::new(16)));
}

#[test]
fn later_label_definition_wins() {
    let mut symtab = SymbolTable::new();
    assert_eq!(
        symtab.define_label("LOOP", Address::new(4)),
        LabelDefinition::Defined
    );
    assert_eq!(
        symtab.define_label("LOOP", Address::new(9)),
        LabelDefinition::Replaced {
            previous: Address::new(4),
            kind: SymbolKind::Label,
        }
    );
    assert_eq!(symtab.resolve("LOOP"), Some(Address::new(9)));
    // Labels do not use up variable addresses.
    assert_eq!(symtab.next_variable_address(), Address::new(16));
    assert_eq!(symtab.user_symbols().count(), 1);
}

#[test]
fn label_can_replace_a_variable() {
    let mut symtab = SymbolTable::new();
    assert_eq!(symtab.resolve("END"), Some(Address::new(16)));
    assert_eq!(
        symtab.define_label("END", Address::new(3)),
        LabelDefinition::Replaced {
            previous: Address::new(16),
            kind: SymbolKind::Variable,
        }
    );
    assert_eq!(symtab.kind("END"), Some(SymbolKind::Label));
    assert_eq!(symtab.resolve("END"), Some(Address::new(3)));
}

#[test]
fn predefined_symbols_are_never_rebound() {
    let mut symtab = SymbolTable::new();
    assert_eq!(
        symtab.define_label("SCREEN", Address::new(7)),
        LabelDefinition::Predefined(Address::new(16384))
    );
    assert_eq!(symtab.resolve("SCREEN"), Some(Address::new(16384)));
    assert_eq!(symtab.user_symbols().count(), 0);
}

#[test]
fn seeded_labels_are_not_variables() {
    let mut symtab = SymbolTable::with_labels([
        (SymbolName::from("END"), Address::new(12)),
        (SymbolName::from("KBD"), Address::new(3)),
    ]);
    assert_eq!(symtab.user_symbols().count(), 0);
    assert_eq!(symtab.resolve("END"), Some(Address::new(12)));
    assert_eq!(symtab.resolve("KBD"), Some(Address::new(24576)));
    assert_eq!(symtab.resolve("x"), Some(Address::new(16)));
    let listed: Vec<&str> = symtab
        .user_symbols()
        .map(|(name, _, _)| name.as_str())
        .collect();
    assert_eq!(listed, vec!["END", "x"]);
}

#[test]
fn display_lists_user_symbols() {
    let mut symtab = SymbolTable::new();
    symtab.define_label("LOOP", Address::new(2));
    symtab.resolve("i");
    let text = symtab.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("LOOP "));
    assert!(lines[0].ends_with("-> 0000000000000010"));
    assert!(lines[1].starts_with("i "));
    assert!(lines[1].contains("variable"));
    assert!(lines[1].ends_with("-> 0000000000010000"));
}

#[proptest]
fn distinct_variables_get_consecutive_addresses(
    #[strategy(proptest::collection::hash_set("[a-z]{1,8}", 1..40))] names: HashSet<String>,
) {
    let mut symtab = SymbolTable::new();
    let names: Vec<String> = names.into_iter().collect();
    for (i, name) in names.iter().enumerate() {
        let expected = Address::try_from(15 + (i + 1)).unwrap();
        assert_eq!(symtab.resolve(name), Some(expected));
    }
    // Resolving again changes nothing.
    for (i, name) in names.iter().enumerate() {
        let expected = Address::try_from(16 + i).unwrap();
        assert_eq!(symtab.resolve(name), Some(expected));
    }
}
