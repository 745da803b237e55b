use phf::{Map, phf_map};

/// Static descriptor for a chemical element as far as scaffold pruning
/// cares: symbol, atomic number, and the maximum bond-order sum the atom
/// can carry without becoming hypervalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub symbol: &'static str,
    pub atomic_number: u8,
    pub max_valence: u8,
}

#[rustfmt::skip]
static ELEMENTS: Map<&'static str, Element> = phf_map! {
    "H"  => Element { symbol: "H",  atomic_number: 1,  max_valence: 1 },
    "B"  => Element { symbol: "B",  atomic_number: 5,  max_valence: 3 },
    "C"  => Element { symbol: "C",  atomic_number: 6,  max_valence: 4 },
    "N"  => Element { symbol: "N",  atomic_number: 7,  max_valence: 3 },
    "O"  => Element { symbol: "O",  atomic_number: 8,  max_valence: 2 },
    "F"  => Element { symbol: "F",  atomic_number: 9,  max_valence: 1 },
    "Si" => Element { symbol: "Si", atomic_number: 14, max_valence: 4 },
    "P"  => Element { symbol: "P",  atomic_number: 15, max_valence: 5 },
    "S"  => Element { symbol: "S",  atomic_number: 16, max_valence: 6 },
    "Cl" => Element { symbol: "Cl", atomic_number: 17, max_valence: 1 },
    "Se" => Element { symbol: "Se", atomic_number: 34, max_valence: 6 },
    "Br" => Element { symbol: "Br", atomic_number: 35, max_valence: 1 },
    "I"  => Element { symbol: "I",  atomic_number: 53, max_valence: 1 },
};

pub const CARBON: u8 = 6;
pub const NITROGEN: u8 = 7;
pub const OXYGEN: u8 = 8;
pub const SULFUR: u8 = 16;

/// Looks up an element by its case-sensitive symbol.
pub fn by_symbol(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.get(symbol)
}

/// Looks up an element by atomic number.
pub fn by_number(atomic_number: u8) -> Option<&'static Element> {
    ELEMENTS.values().find(|e| e.atomic_number == atomic_number)
}

/// Default valence used when an element is not in the table.
const FALLBACK_MAX_VALENCE: u8 = 4;

/// Maximum bond-order sum an atom of the given element may carry.
pub fn max_valence(atomic_number: u8) -> u8 {
    by_number(atomic_number)
        .map(|e| e.max_valence)
        .unwrap_or(FALLBACK_MAX_VALENCE)
}

/// Heteroatom in the scaffold sense: any heavy atom that is not carbon.
pub fn is_heteroatom(atomic_number: u8) -> bool {
    atomic_number != CARBON && atomic_number != 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_symbol_finds_common_elements() {
        assert_eq!(by_symbol("C").unwrap().atomic_number, 6);
        assert_eq!(by_symbol("Cl").unwrap().atomic_number, 17);
        assert_eq!(by_symbol("Br").unwrap().atomic_number, 35);
        assert!(by_symbol("Xx").is_none());
        assert!(by_symbol("c").is_none(), "lookup is case-sensitive");
    }

    #[test]
    fn by_number_roundtrips_with_by_symbol() {
        for symbol in ["C", "N", "O", "S", "P", "F", "I"] {
            let elem = by_symbol(symbol).unwrap();
            assert_eq!(by_number(elem.atomic_number).unwrap().symbol, symbol);
        }
    }

    #[test]
    fn heteroatom_excludes_carbon_and_hydrogen() {
        assert!(!is_heteroatom(CARBON));
        assert!(!is_heteroatom(1));
        assert!(is_heteroatom(NITROGEN));
        assert!(is_heteroatom(OXYGEN));
        assert!(is_heteroatom(SULFUR));
    }

    #[test]
    fn max_valence_has_a_fallback() {
        assert_eq!(max_valence(CARBON), 4);
        assert_eq!(max_valence(OXYGEN), 2);
        assert_eq!(max_valence(200), 4);
    }
}
