use std::fmt;

/// Address of one fixed-size block: a file name plus a block number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockId {
    file_name: String,
    number: usize,
}

impl BlockId {
    pub fn new(file_name: impl Into<String>, number: usize) -> Self {
        Self {
            file_name: file_name.into(),
            number,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn number(&self) -> usize {
        self.number
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[file {}, block {}]", self.file_name, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_by_name_and_number() {
        assert_eq!(BlockId::new("a.tbl", 3), BlockId::new("a.tbl", 3));
        assert_ne!(BlockId::new("a.tbl", 3), BlockId::new("a.tbl", 4));
        assert_ne!(BlockId::new("a.tbl", 3), BlockId::new("b.tbl", 3));
    }

    #[test]
    fn test_hash_key() {
        let mut set = HashSet::new();
        set.insert(BlockId::new("log", 0));
        set.insert(BlockId::new("log", 0));
        set.insert(BlockId::new("log", 1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            BlockId::new("testfile", 2).to_string(),
            "[file testfile, block 2]"
        );
    }
}
