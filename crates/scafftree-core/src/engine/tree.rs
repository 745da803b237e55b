use crate::core::models::ids::ScaffoldId;
use crate::core::scaffold::properties::ScaffoldProperties;
use serde::Serialize;
use slotmap::SlotMap;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

/// A node of the finished hierarchy. The synthetic root carries no
/// structure and uses an empty SMILES string.
#[derive(Debug, Clone, Serialize)]
pub struct Scaffold {
    smiles: String,
    positions: Vec<[f64; 2]>,
    parent: Option<ScaffoldId>,
    children: Vec<ScaffoldId>,
    level: usize,
    molecules: BTreeSet<String>,
    properties: Option<ScaffoldProperties>,
    computed: BTreeMap<String, f64>,
    is_root: bool,
}

impl Scaffold {
    fn new(smiles: String, positions: Vec<[f64; 2]>, properties: Option<ScaffoldProperties>) -> Self {
        Self {
            smiles,
            positions,
            parent: None,
            children: Vec::new(),
            level: 0,
            molecules: BTreeSet::new(),
            properties,
            computed: BTreeMap::new(),
            is_root: false,
        }
    }

    pub fn smiles(&self) -> &str {
        &self.smiles
    }

    pub fn positions(&self) -> &[[f64; 2]] {
        &self.positions
    }

    pub fn parent(&self) -> Option<ScaffoldId> {
        self.parent
    }

    pub fn children(&self) -> &[ScaffoldId] {
        &self.children
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn molecules(&self) -> &BTreeSet<String> {
        &self.molecules
    }

    pub fn properties(&self) -> Option<&ScaffoldProperties> {
        self.properties.as_ref()
    }

    pub fn computed(&self) -> &BTreeMap<String, f64> {
        &self.computed
    }

    pub fn set_computed(&mut self, name: impl Into<String>, value: f64) {
        self.computed.insert(name.into(), value);
    }

    pub fn add_molecule(&mut self, external_id: impl Into<String>) {
        self.molecules.insert(external_id.into());
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }
}

/// Raised when a scaffold is linked under two different parents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentConflict {
    pub smiles: String,
    pub existing_parent: String,
    pub new_parent: String,
}

/// Deduplicated scaffold hierarchy for one generation run.
///
/// Nodes are keyed by canonical SMILES; every SMILES appears exactly
/// once. Levels are assigned from the synthetic root once the run is
/// complete.
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldTree {
    title: String,
    comment: Option<String>,
    initiator: String,
    nodes: SlotMap<ScaffoldId, Scaffold>,
    by_smiles: HashMap<String, ScaffoldId>,
    root: Option<ScaffoldId>,
}

impl ScaffoldTree {
    pub fn new(
        title: impl Into<String>,
        comment: Option<String>,
        initiator: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            comment,
            initiator: initiator.into(),
            nodes: SlotMap::with_key(),
            by_smiles: HashMap::new(),
            root: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn initiator(&self) -> &str {
        &self.initiator
    }

    pub fn root(&self) -> Option<ScaffoldId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: ScaffoldId) -> Option<&Scaffold> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: ScaffoldId) -> Option<&mut Scaffold> {
        self.nodes.get_mut(id)
    }

    pub fn get_by_smiles(&self, smiles: &str) -> Option<ScaffoldId> {
        self.by_smiles.get(smiles).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScaffoldId, &Scaffold)> {
        self.nodes.iter()
    }

    /// Registers a scaffold, returning its id and whether it was new.
    /// An already known SMILES is returned as-is and the supplied data
    /// is discarded.
    pub fn insert(
        &mut self,
        smiles: impl Into<String>,
        positions: Vec<[f64; 2]>,
        properties: Option<ScaffoldProperties>,
    ) -> (ScaffoldId, bool) {
        let smiles = smiles.into();
        if let Some(&id) = self.by_smiles.get(&smiles) {
            return (id, false);
        }
        let id = self
            .nodes
            .insert(Scaffold::new(smiles.clone(), positions, properties));
        self.by_smiles.insert(smiles, id);
        (id, true)
    }

    /// Records `parent` as the parent of `child`. Re-linking to the
    /// same parent is a no-op; linking to a different parent is a
    /// consistency fault reported to the caller.
    pub fn link_parent(
        &mut self,
        child: ScaffoldId,
        parent: ScaffoldId,
    ) -> Result<(), ParentConflict> {
        match self.nodes[child].parent {
            Some(existing) if existing == parent => Ok(()),
            Some(existing) => Err(ParentConflict {
                smiles: self.nodes[child].smiles.clone(),
                existing_parent: self.nodes[existing].smiles.clone(),
                new_parent: self.nodes[parent].smiles.clone(),
            }),
            None => {
                self.nodes[child].parent = Some(parent);
                self.nodes[parent].children.push(child);
                Ok(())
            }
        }
    }

    /// Creates the synthetic root, adopts every parentless scaffold
    /// under it, and assigns levels by breadth-first walk. The root is
    /// level 0.
    pub fn attach_root(&mut self) {
        let orphans: Vec<ScaffoldId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
            .collect();

        let mut root = Scaffold::new(String::new(), Vec::new(), None);
        root.is_root = true;
        let root_id = self.nodes.insert(root);
        self.root = Some(root_id);

        for id in orphans {
            self.nodes[id].parent = Some(root_id);
            self.nodes[root_id].children.push(id);
        }

        let mut queue = VecDeque::from([root_id]);
        while let Some(id) = queue.pop_front() {
            let level = self.nodes[id].level;
            let children = self.nodes[id].children.clone();
            for child in children {
                self.nodes[child].level = level + 1;
                queue.push_back(child);
            }
        }
    }
}
