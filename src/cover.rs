//! Deterministic cover-art selection across every picture a file carries.

/// APIC/FLAC picture type code for the front cover.
pub const FRONT_COVER_TYPE: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureClass {
    FrontCover,
    Other,
}

impl PictureClass {
    /// Classifies an ID3v2 APIC or FLAC picture type code. Both formats share the same numbering.
    pub fn from_type_code(code: u8) -> Self {
        if code == FRONT_COVER_TYPE {
            PictureClass::FrontCover
        } else {
            PictureClass::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub class: PictureClass,
    pub data: Vec<u8>,
}

impl Picture {
    pub fn new(class: PictureClass, data: Vec<u8>) -> Self {
        Self { class, data }
    }
}

/// Picks the first front cover offered, falling back to the first picture of any kind.
///
/// Only the two possible winners are kept; every other candidate is dropped as soon as it is offered.
#[derive(Debug, Default)]
pub struct CoverSelector {
    disabled: bool,
    max_bytes: Option<usize>,
    first: Option<Vec<u8>>,
    first_is_front: bool,
    front: Option<Vec<u8>>,
    offered: usize,
}

impl CoverSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A selector that ignores every candidate.
    pub fn disabled() -> Self {
        Self { disabled: true, ..Self::default() }
    }

    /// Candidates larger than `max_bytes` are ignored.
    pub fn with_max_bytes(mut self, max_bytes: Option<usize>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn offer(&mut self, picture: Picture) {
        if self.disabled {
            return;
        }
        if self.max_bytes.is_some_and(|max| picture.data.len() > max) {
            tracing::debug!("Skipping {} byte picture over the configured limit", picture.data.len());
            return;
        }
        self.offered += 1;
        let is_front = picture.class == PictureClass::FrontCover;
        if self.first.is_none() {
            self.first = Some(picture.data);
            self.first_is_front = is_front;
        } else if is_front && !self.first_is_front && self.front.is_none() {
            self.front = Some(picture.data);
        }
    }

    /// Number of candidates considered so far.
    pub fn offered(&self) -> usize {
        self.offered
    }

    pub fn select(self) -> Option<Vec<u8>> {
        if self.first_is_front {
            return self.first;
        }
        self.front.or(self.first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pic(class: PictureClass, byte: u8) -> Picture {
        Picture::new(class, vec![byte])
    }

    #[test]
    fn test_front_cover_wins_over_earlier_other() {
        let mut selector = CoverSelector::new();
        selector.offer(pic(PictureClass::Other, 1));
        selector.offer(pic(PictureClass::FrontCover, 2));
        selector.offer(pic(PictureClass::Other, 3));
        assert_eq!(selector.select(), Some(vec![2]));
    }

    #[test]
    fn test_first_candidate_without_front_cover() {
        let mut selector = CoverSelector::new();
        selector.offer(pic(PictureClass::Other, 1));
        selector.offer(pic(PictureClass::Other, 3));
        assert_eq!(selector.select(), Some(vec![1]));
    }

    #[test]
    fn test_first_front_cover_wins() {
        let mut selector = CoverSelector::new();
        selector.offer(pic(PictureClass::FrontCover, 1));
        selector.offer(pic(PictureClass::FrontCover, 2));
        assert_eq!(selector.select(), Some(vec![1]));

        let mut selector = CoverSelector::new();
        selector.offer(pic(PictureClass::Other, 9));
        selector.offer(pic(PictureClass::FrontCover, 1));
        selector.offer(pic(PictureClass::FrontCover, 2));
        assert_eq!(selector.select(), Some(vec![1]));
    }

    #[test]
    fn test_no_candidates() {
        assert_eq!(CoverSelector::new().select(), None);
    }

    #[test]
    fn test_disabled_selector() {
        let mut selector = CoverSelector::disabled();
        selector.offer(pic(PictureClass::FrontCover, 1));
        assert_eq!(selector.offered(), 0);
        assert_eq!(selector.select(), None);
    }

    #[test]
    fn test_size_limit() {
        let mut selector = CoverSelector::new().with_max_bytes(Some(2));
        selector.offer(Picture::new(PictureClass::FrontCover, vec![0; 10]));
        selector.offer(Picture::new(PictureClass::Other, vec![7]));
        assert_eq!(selector.select(), Some(vec![7]));
    }

    #[test]
    fn test_classification() {
        assert_eq!(PictureClass::from_type_code(3), PictureClass::FrontCover);
        assert_eq!(PictureClass::from_type_code(0), PictureClass::Other);
        assert_eq!(PictureClass::from_type_code(4), PictureClass::Other);
    }
}
