use crate::congestion::table::{CongestionTable, RoadCount};

/// Max-heap snapshot over congestion records, keyed by vehicle count.
///
/// Built by level-order insertion of every record with a count above zero,
/// each insertion followed by a sift-up, so the root is always the most
/// congested road at build time. The heap stores copies of the three
/// compared fields and is not kept consistent with later table mutations;
/// rebuild it when the table changes.
#[derive(Debug, Default)]
pub struct CongestionRanking {
    entries: Vec<RoadCount>,
}

impl CongestionRanking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the table: every record with `vehicle_count > 0`.
    pub fn build(table: &CongestionTable) -> Self {
        let mut ranking = Self::new();
        for record in table.records() {
            if record.vehicle_count > 0 {
                ranking.insert(*record);
            }
        }
        ranking
    }

    /// Level-order insertion (append keeps the tree complete) followed by a
    /// sift-up while the count exceeds the parent's.
    pub fn insert(&mut self, record: RoadCount) {
        self.entries.push(record);
        self.sift_up(self.entries.len() - 1);
    }

    /// The most congested road at build time, without removing it.
    pub fn most_congested(&self) -> Option<&RoadCount> {
        self.entries.first()
    }

    /// Removes and returns the root, restoring the heap with a sift-down.
    /// The primary control flow only peeks; this exists for consumers that
    /// want to drain the ranking.
    pub fn pop_most_congested(&mut self) -> Option<RoadCount> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.entries.swap(0, last);
        let top = self.entries.pop();
        self.sift_down(0);
        top
    }

    /// Entries in level order.
    pub fn iter(&self) -> impl Iterator<Item = &RoadCount> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.entries[index].vehicle_count <= self.entries[parent].vehicle_count {
                break;
            }
            self.entries.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        loop {
            let mut largest = index;
            for child in [2 * index + 1, 2 * index + 2] {
                if child < self.entries.len()
                    && self.entries[child].vehicle_count > self.entries[largest].vehicle_count
                {
                    largest = child;
                }
            }
            if largest == index {
                break;
            }
            self.entries.swap(index, largest);
            index = largest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_counts(counts: &[(char, char, u32)]) -> CongestionTable {
        let mut table = CongestionTable::new();
        for &(start, end, count) in counts {
            for _ in 0..count {
                table.record_observation(start, end);
            }
        }
        table
    }

    #[test]
    fn root_is_the_global_maximum() {
        let table = table_with_counts(&[('A', 'B', 5), ('B', 'C', 1), ('C', 'D', 3)]);
        let ranking = CongestionRanking::build(&table);
        let top = ranking.most_congested().unwrap();
        assert_eq!((top.start, top.end, top.vehicle_count), ('A', 'B', 5));
        assert_eq!(ranking.len(), 3);
    }

    #[test]
    fn zero_count_records_are_not_ranked() {
        let table = CongestionTable::new();
        let ranking = CongestionRanking::build(&table);
        assert!(ranking.is_empty());
        assert!(ranking.most_congested().is_none());
    }

    #[test]
    fn peek_does_not_remove_the_root() {
        let table = table_with_counts(&[('A', 'B', 2), ('B', 'C', 7)]);
        let ranking = CongestionRanking::build(&table);
        assert_eq!(ranking.most_congested().unwrap().vehicle_count, 7);
        assert_eq!(ranking.most_congested().unwrap().vehicle_count, 7);
        assert_eq!(ranking.len(), 2);
    }

    #[test]
    fn pop_drains_in_descending_count_order() {
        let table = table_with_counts(&[
            ('A', 'B', 4),
            ('B', 'C', 9),
            ('C', 'D', 1),
            ('D', 'E', 6),
        ]);
        let mut ranking = CongestionRanking::build(&table);
        let mut drained = Vec::new();
        while let Some(record) = ranking.pop_most_congested() {
            drained.push(record.vehicle_count);
        }
        assert_eq!(drained, vec![9, 6, 4, 1]);
    }

    #[test]
    fn heap_property_holds_after_every_insert() {
        let mut ranking = CongestionRanking::new();
        for (i, count) in [3u32, 8, 1, 10, 2, 7].iter().enumerate() {
            ranking.insert(RoadCount {
                start: (b'A' + i as u8) as char,
                end: 'Z',
                vehicle_count: *count,
            });
            let entries: Vec<_> = ranking.iter().collect();
            for index in 1..entries.len() {
                let parent = (index - 1) / 2;
                assert!(entries[parent].vehicle_count >= entries[index].vehicle_count);
            }
        }
        assert_eq!(ranking.most_congested().unwrap().vehicle_count, 10);
    }
}
