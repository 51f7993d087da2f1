//! Natural disaster grids: famine, plague and storm cells laid over the board.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisasterKind {
    Famine,
    Plague,
    Storm,
}

impl DisasterKind {
    pub const ALL: [Self; 3] = [Self::Famine, Self::Plague, Self::Storm];
}

impl fmt::Display for DisasterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Famine => "famine",
            Self::Plague => "plague",
            Self::Storm => "storm",
        })
    }
}

/// Position of an area in a disaster grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisasterCell {
    pub row: u32,
    pub column: u32,
}

/// One grid per disaster kind, at most one cell per area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisasterGrids {
    #[serde(default)]
    pub famine: BTreeMap<String, DisasterCell>,
    #[serde(default)]
    pub plague: BTreeMap<String, DisasterCell>,
    #[serde(default)]
    pub storm: BTreeMap<String, DisasterCell>,
}

impl DisasterGrids {
    #[must_use]
    pub const fn grid(&self, kind: DisasterKind) -> &BTreeMap<String, DisasterCell> {
        match kind {
            DisasterKind::Famine => &self.famine,
            DisasterKind::Plague => &self.plague,
            DisasterKind::Storm => &self.storm,
        }
    }

    pub(crate) fn grid_mut(
        &mut self,
        kind: DisasterKind,
    ) -> &mut BTreeMap<String, DisasterCell> {
        match kind {
            DisasterKind::Famine => &mut self.famine,
            DisasterKind::Plague => &mut self.plague,
            DisasterKind::Storm => &mut self.storm,
        }
    }

    /// Areas struck by a roll: every cell in the given row or the given column.
    ///
    /// Either coordinate may be absent. Results are in area-code order.
    #[must_use]
    pub fn roll(&self, kind: DisasterKind, row: Option<u32>, column: Option<u32>) -> Vec<&str> {
        self.grid(kind)
            .iter()
            .filter(|(_, cell)| row == Some(cell.row) || column == Some(cell.column))
            .map(|(code, _)| code.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grids() -> DisasterGrids {
        let mut grids = DisasterGrids::default();
        let famine = grids.grid_mut(DisasterKind::Famine);
        famine.insert("MIL".to_string(), DisasterCell { row: 1, column: 1 });
        famine.insert("PAV".to_string(), DisasterCell { row: 1, column: 2 });
        famine.insert("GEN".to_string(), DisasterCell { row: 2, column: 1 });
        famine.insert("FLO".to_string(), DisasterCell { row: 3, column: 3 });
        grids
    }

    #[test]
    fn roll_matches_row_or_column() {
        let grids = grids();
        assert_eq!(
            grids.roll(DisasterKind::Famine, Some(1), None),
            vec!["MIL", "PAV"]
        );
        assert_eq!(
            grids.roll(DisasterKind::Famine, None, Some(1)),
            vec!["GEN", "MIL"]
        );
        assert_eq!(
            grids.roll(DisasterKind::Famine, Some(1), Some(3)),
            vec!["FLO", "MIL", "PAV"]
        );
    }

    #[test]
    fn roll_without_coordinates_or_cells_is_empty() {
        let grids = grids();
        assert!(grids.roll(DisasterKind::Famine, None, None).is_empty());
        assert!(grids.roll(DisasterKind::Storm, Some(1), Some(1)).is_empty());
    }
}
