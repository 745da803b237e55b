use crate::core::models::atom::Atom;
use crate::core::models::element;
use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::AtomId;
use crate::core::models::topology::BondOrder;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SmilesError {
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("Unknown element '{0}'")]
    UnknownElement(String),

    #[error("Unexpected end of input: {0}")]
    UnexpectedEnd(&'static str),

    #[error("Ring closure {0} without a preceding atom")]
    DanglingRingClosure(u16),

    #[error("Unmatched ring closure(s): {0:?}")]
    UnmatchedRingClosures(Vec<u16>),

    #[error("{0} unmatched '(' in input")]
    UnmatchedBranches(usize),
}

/// Parses a SMILES string into a molecular graph.
///
/// Stereochemistry markers are consumed and discarded; aromatic
/// lowercase atoms are carried as aromatic flags and aromatic bond
/// orders without further perception.
pub fn parse(smiles: &str) -> Result<MolecularGraph, SmilesError> {
    let mut parser = SmilesParser::new(smiles);
    parser.parse()?;
    parser.finish()
}

struct SmilesParser<'a> {
    input: &'a [u8],
    pos: usize,
    graph: MolecularGraph,
    /// Open ring closures: digit -> (atom id, bond order annotated at the opening).
    ring_closures: BTreeMap<u16, (AtomId, Option<BondOrder>)>,
    /// Branch stack of atom ids.
    stack: Vec<AtomId>,
    prev_atom: Option<AtomId>,
    pending_bond: Option<BondOrder>,
}

impl<'a> SmilesParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            graph: MolecularGraph::new(),
            ring_closures: BTreeMap::new(),
            stack: Vec::new(),
            prev_atom: None,
            pending_bond: None,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn parse(&mut self) -> Result<(), SmilesError> {
        while self.pos < self.input.len() {
            match self.peek() {
                Some(b'(') => {
                    self.advance();
                    if let Some(prev) = self.prev_atom {
                        self.stack.push(prev);
                    }
                }
                Some(b')') => {
                    self.advance();
                    self.prev_atom = self.stack.pop();
                    self.pending_bond = None;
                }
                Some(b'-') => {
                    self.advance();
                    self.pending_bond = Some(BondOrder::Single);
                }
                Some(b'=') => {
                    self.advance();
                    self.pending_bond = Some(BondOrder::Double);
                }
                Some(b'#') => {
                    self.advance();
                    self.pending_bond = Some(BondOrder::Triple);
                }
                Some(b':') => {
                    self.advance();
                    self.pending_bond = Some(BondOrder::Aromatic);
                }
                Some(b'/') | Some(b'\\') => {
                    // Cis/trans markers carry no scaffold information.
                    self.advance();
                }
                Some(b'%') => {
                    self.advance();
                    let ring_num = self.parse_two_digit_ring()?;
                    self.handle_ring_closure(ring_num)?;
                }
                Some(b'[') => {
                    self.parse_bracket_atom()?;
                }
                Some(ch) if ch.is_ascii_digit() => {
                    self.advance();
                    self.handle_ring_closure((ch - b'0') as u16)?;
                }
                Some(ch) if is_organic_atom_start(ch) => {
                    self.parse_organic_atom()?;
                }
                Some(b'.') => {
                    self.advance();
                    self.prev_atom = None;
                    self.pending_bond = None;
                }
                Some(ch) => {
                    return Err(SmilesError::UnexpectedCharacter {
                        character: ch as char,
                        position: self.pos,
                    });
                }
                None => break,
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<MolecularGraph, SmilesError> {
        if !self.ring_closures.is_empty() {
            let open: Vec<u16> = self.ring_closures.keys().copied().collect();
            return Err(SmilesError::UnmatchedRingClosures(open));
        }
        if !self.stack.is_empty() {
            return Err(SmilesError::UnmatchedBranches(self.stack.len()));
        }
        Ok(self.graph)
    }

    fn parse_organic_atom(&mut self) -> Result<(), SmilesError> {
        let ch = self.advance().ok_or(SmilesError::UnexpectedEnd("atom"))?;
        let is_aromatic = ch.is_ascii_lowercase();
        let upper = ch.to_ascii_uppercase();

        let symbol = match upper {
            b'B' => {
                if !is_aromatic && self.peek() == Some(b'r') {
                    self.advance();
                    "Br"
                } else {
                    "B"
                }
            }
            b'C' => {
                if !is_aromatic && self.peek() == Some(b'l') {
                    self.advance();
                    "Cl"
                } else {
                    "C"
                }
            }
            b'N' => "N",
            b'O' => "O",
            b'P' => "P",
            b'S' => {
                if !is_aromatic && self.peek() == Some(b'i') {
                    self.advance();
                    "Si"
                } else if !is_aromatic && self.peek() == Some(b'e') {
                    self.advance();
                    "Se"
                } else {
                    "S"
                }
            }
            b'F' => "F",
            b'I' => "I",
            _ => {
                return Err(SmilesError::UnknownElement((upper as char).to_string()));
            }
        };

        let elem = element::by_symbol(symbol)
            .ok_or_else(|| SmilesError::UnknownElement(symbol.to_string()))?;

        let mut atom = Atom::new(elem.atomic_number);
        atom.is_aromatic = is_aromatic;

        let atom_id = self.graph.add_atom(atom);
        self.bond_to_prev(atom_id);
        self.prev_atom = Some(atom_id);
        Ok(())
    }

    fn parse_bracket_atom(&mut self) -> Result<(), SmilesError> {
        self.advance(); // consume '['

        // Isotope labels are parsed and discarded.
        let _isotope = self.parse_optional_number();

        let ch = self
            .advance()
            .ok_or(SmilesError::UnexpectedEnd("bracket atom"))?;
        let is_aromatic = ch.is_ascii_lowercase();
        let upper = ch.to_ascii_uppercase();

        let symbol = if let Some(next) = self.peek() {
            if next.is_ascii_lowercase() && next != b'@' {
                let two_letter = format!("{}{}", upper as char, next as char);
                if element::by_symbol(&two_letter).is_some() {
                    self.advance();
                    two_letter
                } else {
                    String::from(upper as char)
                }
            } else {
                String::from(upper as char)
            }
        } else {
            String::from(upper as char)
        };

        let elem = element::by_symbol(&symbol)
            .ok_or_else(|| SmilesError::UnknownElement(symbol.clone()))?;

        // Chirality markers carry no scaffold information.
        while self.peek() == Some(b'@') {
            self.advance();
        }

        let mut explicit_h = 0u8;
        if self.peek() == Some(b'H') {
            self.advance();
            explicit_h = match self.peek() {
                Some(d) if d.is_ascii_digit() => {
                    self.advance();
                    d - b'0'
                }
                _ => 1,
            };
        }

        let charge = self.parse_charge();

        if self.advance() != Some(b']') {
            return Err(SmilesError::UnexpectedEnd("expected ']'"));
        }

        let mut atom = Atom::new(elem.atomic_number);
        atom.is_aromatic = is_aromatic;
        atom.formal_charge = charge;
        atom.explicit_hydrogens = Some(explicit_h);

        let atom_id = self.graph.add_atom(atom);
        self.bond_to_prev(atom_id);
        self.prev_atom = Some(atom_id);
        Ok(())
    }

    fn parse_charge(&mut self) -> i8 {
        match self.peek() {
            Some(b'+') => {
                self.advance();
                match self.peek() {
                    Some(d) if d.is_ascii_digit() => {
                        self.advance();
                        (d - b'0') as i8
                    }
                    Some(b'+') => {
                        let mut c = 1i8;
                        while self.peek() == Some(b'+') {
                            self.advance();
                            c += 1;
                        }
                        c
                    }
                    _ => 1,
                }
            }
            Some(b'-') => {
                self.advance();
                match self.peek() {
                    Some(d) if d.is_ascii_digit() => {
                        self.advance();
                        -((d - b'0') as i8)
                    }
                    Some(b'-') => {
                        let mut c = -1i8;
                        while self.peek() == Some(b'-') {
                            self.advance();
                            c -= 1;
                        }
                        c
                    }
                    _ => -1,
                }
            }
            _ => 0,
        }
    }

    fn parse_optional_number(&mut self) -> Option<u32> {
        let mut n: u32 = 0;
        let mut found = false;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
                n = n * 10 + (ch - b'0') as u32;
                found = true;
            } else {
                break;
            }
        }
        found.then_some(n)
    }

    fn parse_two_digit_ring(&mut self) -> Result<u16, SmilesError> {
        let d1 = self
            .advance()
            .ok_or(SmilesError::UnexpectedEnd("digit after '%'"))?;
        let d2 = self
            .advance()
            .ok_or(SmilesError::UnexpectedEnd("second digit after '%'"))?;
        if !d1.is_ascii_digit() || !d2.is_ascii_digit() {
            return Err(SmilesError::UnexpectedCharacter {
                character: d1 as char,
                position: self.pos,
            });
        }
        Ok((d1 - b'0') as u16 * 10 + (d2 - b'0') as u16)
    }

    fn handle_ring_closure(&mut self, ring_num: u16) -> Result<(), SmilesError> {
        let current = self
            .prev_atom
            .ok_or(SmilesError::DanglingRingClosure(ring_num))?;

        if let Some((open_atom, open_bond)) = self.ring_closures.remove(&ring_num) {
            let order = self.pending_bond.or(open_bond).unwrap_or(BondOrder::Single);
            let both_aromatic = self.is_aromatic(open_atom) && self.is_aromatic(current);
            let order = if both_aromatic && order == BondOrder::Single {
                BondOrder::Aromatic
            } else {
                order
            };
            self.graph.add_bond(open_atom, current, order);
            self.pending_bond = None;
        } else {
            self.ring_closures
                .insert(ring_num, (current, self.pending_bond.take()));
        }
        Ok(())
    }

    fn bond_to_prev(&mut self, atom_id: AtomId) {
        if let Some(prev) = self.prev_atom {
            let both_aromatic = self.is_aromatic(prev) && self.is_aromatic(atom_id);
            let order = self.pending_bond.take().unwrap_or(if both_aromatic {
                BondOrder::Aromatic
            } else {
                BondOrder::Single
            });
            self.graph.add_bond(prev, atom_id, order);
        }
        self.pending_bond = None;
    }

    fn is_aromatic(&self, atom_id: AtomId) -> bool {
        self.graph.atom(atom_id).is_some_and(|a| a.is_aromatic)
    }
}

fn is_organic_atom_start(ch: u8) -> bool {
    matches!(
        ch,
        b'B' | b'C' | b'N' | b'O' | b'P' | b'S' | b'F' | b'I' | b'b' | b'c' | b'n' | b'o' | b'p'
            | b's'
    )
}
