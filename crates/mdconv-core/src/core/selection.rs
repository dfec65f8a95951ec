use crate::core::models::frame::Topology;
use phf::{Set, phf_set};
use serde::Deserialize;

/// Residue names treated as protein, covering the standard amino acids, the
/// protonation/tautomer variants emitted by common force fields, and terminal caps.
static PROTEIN_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    "ASH", "GLH", "LYN", "CYX", "CYM", "CYS2",
    "HID", "HIE", "HIP", "HSD", "HSE", "HSP", "HISA", "HISB", "HISH", "HISD", "HISE",
    "ACE", "NME", "NAC", "NH2",
};

pub fn is_protein_residue(name: &str) -> bool {
    PROTEIN_RESIDUE_NAMES.contains(name)
}

/// Which atoms of a run contribute to the observables.
///
/// Solvent and ions are typically excluded; the selection is always supplied by the
/// caller, never inferred from the data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum AtomSelection {
    /// Atoms whose residue name is a known amino acid or cap.
    #[default]
    Protein,
    /// Atoms whose residue name appears in `include`.
    Residues { include: Vec<String> },
    /// Every atom whose residue name does not appear in `exclude`.
    ExcludeResidues { exclude: Vec<String> },
    /// Atoms `first..=last` by 0-based file index.
    Range { first: usize, last: usize },
    All,
}

impl AtomSelection {
    /// Resolves the selection into ascending atom indices of `topology`.
    pub fn resolve(&self, topology: &Topology) -> Vec<usize> {
        let atoms = topology.atoms.iter().enumerate();
        match self {
            AtomSelection::Protein => atoms
                .filter(|(_, a)| is_protein_residue(&a.residue_name))
                .map(|(i, _)| i)
                .collect(),
            AtomSelection::Residues { include } => atoms
                .filter(|(_, a)| include.iter().any(|r| *r == a.residue_name))
                .map(|(i, _)| i)
                .collect(),
            AtomSelection::ExcludeResidues { exclude } => atoms
                .filter(|(_, a)| !exclude.iter().any(|r| *r == a.residue_name))
                .map(|(i, _)| i)
                .collect(),
            AtomSelection::Range { first, last } => {
                let end = (*last).min(topology.len().saturating_sub(1));
                if topology.is_empty() || first > last {
                    Vec::new()
                } else {
                    (*first..=end).collect()
                }
            }
            AtomSelection::All => (0..topology.len()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::frame::TopologyAtom;

    fn topology() -> Topology {
        let atom = |n: isize, res: &str, name: &str| TopologyAtom {
            residue_number: n,
            residue_name: res.to_string(),
            atom_name: name.to_string(),
        };
        Topology {
            title: "test".into(),
            atoms: vec![
                atom(1, "LYS", "N"),
                atom(1, "LYS", "CA"),
                atom(2, "HSD", "CA"),
                atom(3, "SOL", "OW"),
                atom(3, "SOL", "HW1"),
                atom(4, "CL", "CL"),
            ],
        }
    }

    #[test]
    fn protein_selection_skips_solvent_and_ions() {
        assert_eq!(AtomSelection::Protein.resolve(&topology()), vec![0, 1, 2]);
    }

    #[test]
    fn residue_include_and_exclude_lists() {
        let include = AtomSelection::Residues {
            include: vec!["SOL".into()],
        };
        assert_eq!(include.resolve(&topology()), vec![3, 4]);

        let exclude = AtomSelection::ExcludeResidues {
            exclude: vec!["SOL".into(), "CL".into()],
        };
        assert_eq!(exclude.resolve(&topology()), vec![0, 1, 2]);
    }

    #[test]
    fn range_is_inclusive_and_clamped() {
        let range = AtomSelection::Range { first: 1, last: 2 };
        assert_eq!(range.resolve(&topology()), vec![1, 2]);

        let past_end = AtomSelection::Range { first: 4, last: 99 };
        assert_eq!(past_end.resolve(&topology()), vec![4, 5]);

        let inverted = AtomSelection::Range { first: 3, last: 1 };
        assert!(inverted.resolve(&topology()).is_empty());
    }

    #[test]
    fn range_beyond_topology_is_empty() {
        let range = AtomSelection::Range { first: 10, last: 20 };
        assert!(range.resolve(&topology()).is_empty());
    }

    #[test]
    fn all_selects_everything() {
        assert_eq!(AtomSelection::All.resolve(&topology()).len(), 6);
    }
}
