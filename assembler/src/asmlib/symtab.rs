use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use tracing::{event, Level};

use base::prelude::*;

use super::symbol::SymbolName;

#[cfg(test)]
mod tests;

/// The highest address a variable can have: an address instruction
/// can only load 15 bits.
const LAST_VARIABLE: Address = Address::new(Operand::MAX.value());

/// The symbols every program can use without defining them.
const PREDEFINED: [(&str, u16); 23] = [
    ("R0", 0),
    ("R1", 1),
    ("R2", 2),
    ("R3", 3),
    ("R4", 4),
    ("R5", 5),
    ("R6", 6),
    ("R7", 7),
    ("R8", 8),
    ("R9", 9),
    ("R10", 10),
    ("R11", 11),
    ("R12", 12),
    ("R13", 13),
    ("R14", 14),
    ("R15", 15),
    ("SCREEN", SCREEN.value()),
    ("KBD", KBD.value()),
    ("SP", 0),
    ("LCL", 1),
    ("ARG", 2),
    ("THIS", 3),
    ("THAT", 4),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Predefined,
    /// The name of an instruction slot, defined with `(NAME)`.
    Label,
    /// A RAM register allocated on first use of `@name`.
    Variable,
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            SymbolKind::Predefined => "predefined",
            SymbolKind::Label => "label",
            SymbolKind::Variable => "variable",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InternalSymbolDef {
    address: Address,
    kind: SymbolKind,
    // Labels seeded from a previous scan of the program are not
    // listed until the program mentions them.
    listed: bool,
}

/// The outcome of [`SymbolTable::define_label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelDefinition {
    /// The label is now bound (possibly to the value it already had).
    Defined,
    /// The name was already bound to a different address; the new
    /// address has replaced it.
    Replaced { previous: Address, kind: SymbolKind },
    /// The name is predefined, so it was left alone.
    Predefined(Address),
}

/// Maps symbol names to addresses for the duration of one assembly
/// run.
///
/// The table starts out holding only the predefined symbols.  Labels
/// are added by [`SymbolTable::define_label`] and variables are
/// allocated (from address 16 upward, in order of first reference)
/// by [`SymbolTable::resolve`].
#[derive(Debug, Clone)]
pub struct SymbolTable {
    definitions: BTreeMap<SymbolName, InternalSymbolDef>,
    // User-defined symbols in the order they were first mentioned.
    order: Vec<SymbolName>,
    next_variable: Address,
}

impl Default for SymbolTable {
    fn default() -> SymbolTable {
        SymbolTable::new()
    }
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> SymbolTable {
        let definitions = PREDEFINED
            .iter()
            .map(|(name, value)| {
                (
                    SymbolName::from(*name),
                    InternalSymbolDef {
                        address: Address::new(*value),
                        kind: SymbolKind::Predefined,
                        listed: false,
                    },
                )
            })
            .collect();
        SymbolTable {
            definitions,
            order: Vec::new(),
            next_variable: FIRST_VARIABLE,
        }
    }

    /// Create a table which already knows the given labels.  This is
    /// how forward references to labels are made to work: the labels
    /// found by an earlier scan of the program are bound before the
    /// program is assembled.
    pub fn with_labels<I>(labels: I) -> SymbolTable
    where
        I: IntoIterator<Item = (SymbolName, Address)>,
    {
        let mut table = SymbolTable::new();
        for (name, address) in labels {
            if table.is_predefined(name.as_str()) {
                continue;
            }
            table.definitions.insert(
                name,
                InternalSymbolDef {
                    address,
                    kind: SymbolKind::Label,
                    listed: false,
                },
            );
        }
        table
    }

    #[must_use]
    pub fn is_predefined(&self, name: &str) -> bool {
        matches!(
            self.definitions.get(name),
            Some(InternalSymbolDef {
                kind: SymbolKind::Predefined,
                ..
            })
        )
    }

    /// Look a name up without defining it.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Address> {
        self.definitions.get(name).map(|def| def.address)
    }

    #[must_use]
    pub fn kind(&self, name: &str) -> Option<SymbolKind> {
        self.definitions.get(name).map(|def| def.kind)
    }

    /// Return the address bound to `name`, binding it to a freshly
    /// allocated variable address if it is not yet known.
    ///
    /// Returns `None` (and binds nothing) when `name` is new but
    /// every variable address up to [`Operand::MAX`] is taken.
    pub fn resolve(&mut self, name: &str) -> Option<Address> {
        if let Some(address) = self.lookup(name) {
            self.mark_listed(name);
            return Some(address);
        }
        let address = self.next_variable;
        let next = match address.successor() {
            Some(next) if address <= LAST_VARIABLE => next,
            _ => {
                event!(
                    Level::DEBUG,
                    "cannot allocate variable {name}: no addressable RAM register is left"
                );
                return None;
            }
        };
        self.next_variable = next;
        event!(
            Level::TRACE,
            "allocated variable {name} at address {address}"
        );
        self.insert_listed(name, address, SymbolKind::Variable);
        Some(address)
    }

    /// Bind `name` to the instruction slot `address`.  A later
    /// definition of the same label silently wins over an earlier
    /// one.  Predefined symbols are never rebound.
    pub fn define_label(&mut self, name: &str, address: Address) -> LabelDefinition {
        match self.definitions.get(name).cloned() {
            Some(InternalSymbolDef {
                address: existing,
                kind: SymbolKind::Predefined,
                ..
            }) => LabelDefinition::Predefined(existing),
            Some(existing) => {
                event!(Level::TRACE, "binding label {name} to {address}");
                self.insert_listed(name, address, SymbolKind::Label);
                if existing.address == address {
                    LabelDefinition::Defined
                } else {
                    LabelDefinition::Replaced {
                        previous: existing.address,
                        kind: existing.kind,
                    }
                }
            }
            None => {
                event!(Level::TRACE, "binding label {name} to {address}");
                self.insert_listed(name, address, SymbolKind::Label);
                LabelDefinition::Defined
            }
        }
    }

    fn insert_listed(&mut self, name: &str, address: Address, kind: SymbolKind) {
        let previously_listed = self
            .definitions
            .get(name)
            .is_some_and(|def| def.listed);
        if !previously_listed {
            self.order.push(SymbolName::from(name));
        }
        self.definitions.insert(
            SymbolName::from(name),
            InternalSymbolDef {
                address,
                kind,
                listed: true,
            },
        );
    }

    fn mark_listed(&mut self, name: &str) {
        if let Some(def) = self.definitions.get_mut(name) {
            if def.kind != SymbolKind::Predefined && !def.listed {
                def.listed = true;
                self.order.push(SymbolName::from(name));
            }
        }
    }

    /// The user-defined symbols (labels and variables), in the order
    /// in which the program first mentioned them.
    pub fn user_symbols(&self) -> impl Iterator<Item = (&SymbolName, Address, SymbolKind)> + '_ {
        self.order.iter().filter_map(|name| {
            self.definitions
                .get_key_value(name)
                .map(|(name, def)| (name, def.address, def.kind))
        })
    }

    /// All the labels in the table (whether or not they have been
    /// mentioned yet).
    pub fn labels(&self) -> impl Iterator<Item = (&SymbolName, Address)> + '_ {
        self.definitions
            .iter()
            .filter(|(_, def)| def.kind == SymbolKind::Label)
            .map(|(name, def)| (name, def.address))
    }

    /// The address the next new variable would be given.  Once this
    /// is past [`Operand::MAX`], no more variables can be allocated.
    #[must_use]
    pub fn next_variable_address(&self) -> Address {
        self.next_variable
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Displays the user-defined part of the table, one symbol per line.
impl Display for SymbolTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (name, address, kind) in self.user_symbols() {
            writeln!(f, "{name:<24} {address:>5}  {kind:<8}  -> {address:016b}")?;
        }
        Ok(())
    }
}
