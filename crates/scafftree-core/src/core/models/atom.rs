use super::element;
use nalgebra::Point2;

/// Represents a heavy atom in a molecular graph.
///
/// Hydrogens are kept implicit; the explicit hydrogen count is only
/// recorded for bracket atoms (e.g. `[nH]`) where it is part of the
/// structure's identity. The optional 2-D position is a depiction
/// artifact and never participates in structural comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Atomic number of the element (e.g. 6 for carbon).
    pub atomic_number: u8,
    /// Whether the atom is part of an aromatic system.
    pub is_aromatic: bool,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Explicit hydrogen count from a bracket-atom specification.
    pub explicit_hydrogens: Option<u8>,
    /// 2-D depiction coordinates, if a layout has been generated.
    pub position: Option<Point2<f64>>,
}

impl Atom {
    /// Creates a new non-aromatic, uncharged atom of the given element.
    pub fn new(atomic_number: u8) -> Self {
        Self {
            atomic_number,
            is_aromatic: false,
            formal_charge: 0,
            explicit_hydrogens: None,
            position: None,
        }
    }

    pub fn is_carbon(&self) -> bool {
        self.atomic_number == element::CARBON
    }

    pub fn is_heteroatom(&self) -> bool {
        element::is_heteroatom(self.atomic_number)
    }

    pub fn is_nitrogen(&self) -> bool {
        self.atomic_number == element::NITROGEN
    }

    pub fn is_oxygen(&self) -> bool {
        self.atomic_number == element::OXYGEN
    }

    pub fn is_sulfur(&self) -> bool {
        self.atomic_number == element::SULFUR
    }

    /// Element symbol, if the element is known to the static table.
    pub fn symbol(&self) -> Option<&'static str> {
        element::by_number(self.atomic_number).map(|e| e.symbol)
    }
}
