use crate::buffer::{composable, Single, VarUIntArray, VarUIntBytes};

composable! {
    /// One witness stack item.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct WitnessScript {
        pub data: Vec<u8> => VarUIntBytes,
    }
}

composable! {
    /// The witness stack of one input.
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct Witness {
        pub scripts: Vec<WitnessScript> => VarUIntArray<Single>,
    }
}

impl Witness {
    pub fn new(items: Vec<Vec<u8>>) -> Self {
        Self {
            scripts: items.into_iter().map(|data| WitnessScript { data }).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Composable;

    #[test]
    fn empty_witness_is_single_zero() {
        assert_eq!(Witness::default().to_hex().unwrap(), "00");
    }

    #[test]
    fn witness_items_are_length_prefixed() {
        let witness = Witness::new(vec![vec![0xaa, 0xbb], vec![0x02; 33]]);
        let hex_str = witness.to_hex().unwrap();
        assert_eq!(hex_str, format!("0202aabb21{}", "02".repeat(33)));
        assert_eq!(Witness::from_hex(&hex_str).unwrap(), witness);
    }
}
