use common::{Problem, VirtualContestItem};

/// Ordered selection of contest problems.
///
/// Ids are unique: duplicates are rejected at insertion time. Order is
/// insertion order; the `order` field of each item is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContestItemList {
    items: Vec<VirtualContestItem>,
}

impl ContestItemList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from an existing item list, keeping the first item of each id.
    pub fn from_items(items: impl IntoIterator<Item = VirtualContestItem>) -> Self {
        let mut list = Self::new();
        for item in items {
            if !list.contains(&item.id) {
                list.items.push(item);
            }
        }
        list
    }

    pub fn items(&self) -> &[VirtualContestItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &VirtualContestItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, problem_id: &str) -> bool {
        self.items.iter().any(|item| item.id == problem_id)
    }

    /// Append every problem not already selected, including ones added
    /// earlier in the same batch. Returns how many were appended.
    pub fn add<'a>(&mut self, problems: impl IntoIterator<Item = &'a Problem>) -> usize {
        let before = self.items.len();
        for problem in problems {
            if !self.contains(&problem.id) {
                self.items.push(VirtualContestItem::new(problem.id.clone()));
            }
        }
        self.items.len() - before
    }

    /// Returns whether an item was removed.
    pub fn remove(&mut self, problem_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != problem_id);
        self.items.len() != before
    }

    pub fn set_point(&mut self, index: usize, point: i64) {
        if let Some(item) = self.items.get_mut(index) {
            item.point = Some(point);
        }
    }

    /// Store the point typed into a point field. Text that does not start
    /// with an integer is stored as `0`.
    pub fn set_point_input(&mut self, index: usize, input: &str) {
        self.set_point(index, parse_point_input(input));
    }

    pub fn unset_point(&mut self, index: usize) {
        if let Some(item) = self.items.get_mut(index) {
            item.point = None;
        }
    }

    pub fn position(&self, problem_id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == problem_id)
    }
}

/// Lenient integer parse: optional surrounding whitespace and sign, then the
/// longest run of leading digits. Anything without leading digits is `0`.
pub fn parse_point_input(input: &str) -> i64 {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });
    if negative { -value } else { value }
}
