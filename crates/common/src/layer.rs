use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Maximum number of collision layers.
pub const LAYER_COUNT: u8 = 32;

/// Errors from layer construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayerError {
    #[error("layer index {0} out of range (0..{LAYER_COUNT})")]
    OutOfRange(u8),
}

/// A single collision layer, `0..32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Layer(u8);

impl Layer {
    pub const DEFAULT: Layer = Layer(0);

    pub fn new(index: u8) -> Result<Self, LayerError> {
        if index < LAYER_COUNT {
            Ok(Self(index))
        } else {
            Err(LayerError::OutOfRange(index))
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn mask(self) -> LayerMask {
        LayerMask(1 << self.0)
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Layer {
    type Error = LayerError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<Layer> for u8 {
    fn from(layer: Layer) -> u8 {
        layer.0
    }
}

/// Bit set of layers a raycast is allowed to hit.
///
/// Serialized as a list of layer indices so config files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub fn from_layers(layers: &[Layer]) -> Self {
        layers.iter().fold(Self::NONE, |mask, l| mask | l.mask())
    }

    pub fn contains(self, layer: Layer) -> bool {
        self.0 & (1 << layer.0) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn layers(self) -> impl Iterator<Item = Layer> {
        (0..LAYER_COUNT)
            .filter(move |i| self.0 & (1 << i) != 0)
            .map(Layer)
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        LayerMask(self.0 | rhs.0)
    }
}

impl TryFrom<Vec<u8>> for LayerMask {
    type Error = LayerError;

    fn try_from(indices: Vec<u8>) -> Result<Self, Self::Error> {
        let layers = indices
            .into_iter()
            .map(Layer::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_layers(&layers))
    }
}

impl From<LayerMask> for Vec<u8> {
    fn from(mask: LayerMask) -> Vec<u8> {
        mask.layers().map(Layer::index).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_bounds() {
        assert!(Layer::new(31).is_ok());
        assert_eq!(Layer::new(32), Err(LayerError::OutOfRange(32)));
    }

    #[test]
    fn mask_membership() {
        let ground = Layer::new(6).unwrap();
        let props = Layer::new(7).unwrap();
        let mask = ground.mask();
        assert!(mask.contains(ground));
        assert!(!mask.contains(props));
        assert!((mask | props.mask()).contains(props));
        assert!(LayerMask::ALL.contains(props));
        assert!(!LayerMask::NONE.contains(ground));
    }

    #[test]
    fn mask_lists_its_layers() {
        let mask = LayerMask::from_layers(&[Layer::new(2).unwrap(), Layer::new(9).unwrap()]);
        let indices: Vec<u8> = mask.into();
        assert_eq!(indices, vec![2, 9]);
        assert_eq!(LayerMask::try_from(indices), Ok(mask));
    }

    #[test]
    fn mask_rejects_bad_index() {
        assert!(LayerMask::try_from(vec![1, 40]).is_err());
    }
}
