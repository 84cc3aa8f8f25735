// Symbol table: index-to-name mapping for transition labels.

/// Ordered table of symbol names.
///
/// A table holds one or more columns of names. With a single column the
/// table is global: every unit of an automaton resolves its labels against
/// it. When the column count equals the unit count of the owning automaton,
/// column `u` belongs to unit `u` (per-unit symbol tables).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    columns: Vec<Vec<String>>,
}

impl SymbolTable {
    /// Create an empty table with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a single-column table from a sequence of names.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for sym in symbols {
            table.push(sym);
        }
        table
    }

    /// Create a multi-column table, typically one column per unit.
    pub fn from_columns(columns: Vec<Vec<String>>) -> Self {
        Self { columns }
    }

    /// Append a name to the first column and return its index.
    ///
    /// Duplicates are stored as separate rows.
    pub fn push(&mut self, symbol: impl Into<String>) -> u32 {
        if self.columns.is_empty() {
            self.columns.push(Vec::new());
        }
        let symbol = symbol.into();
        let idx = self.columns[0].len() as u32;
        self.columns[0].push(symbol);
        idx
    }

    /// Fetch a name from the first column.
    pub fn get(&self, index: u32) -> Option<&str> {
        self.get_in(0, index)
    }

    /// Fetch a name from a specific column.
    pub fn get_in(&self, column: usize, index: u32) -> Option<&str> {
        self.columns
            .get(column)?
            .get(index as usize)
            .map(String::as_str)
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (length of the longest column).
    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// True if the table holds no names at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all columns and names.
    pub fn clear(&mut self) {
        self.columns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_lookup() {
        let mut table = SymbolTable::new();
        assert!(table.is_empty());
        assert_eq!(table.push("a"), 0);
        assert_eq!(table.push("b"), 1);
        assert_eq!(table.get(1), Some("b"));
        assert_eq!(table.get(0), Some("a"));
        assert_eq!(table.get(2), None);
        assert_eq!(table.column_count(), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn duplicates_are_kept() {
        let table = SymbolTable::from_symbols(["a", "b", "a"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(2), Some("a"));
    }

    #[test]
    fn per_unit_columns() {
        let table = SymbolTable::from_columns(vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["p".to_string()],
        ]);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get_in(1, 0), Some("p"));
        assert_eq!(table.get_in(1, 1), None);
        assert_eq!(table.get_in(2, 0), None);
        assert_eq!(table.get(1), Some("b"));
    }

    #[test]
    fn clear_empties_table() {
        let mut table = SymbolTable::from_symbols(["a"]);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.get(0), None);
    }
}
