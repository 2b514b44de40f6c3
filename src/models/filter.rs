/// Optional center/classroom restriction applied to student-based queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlacementFilter {
    pub center_id: Option<i64>,
    pub classroom_id: Option<i64>,
}

impl PlacementFilter {
    pub fn new(center_id: Option<i64>, classroom_id: Option<i64>) -> Self {
        Self {
            center_id,
            classroom_id,
        }
    }

    /// SQL conditions (each prefixed with ` AND `) on the students table
    /// aliased as `alias`, and the values to bind in order.
    pub fn sql(&self, alias: &str) -> (String, Vec<i64>) {
        let mut clause = String::new();
        let mut values = Vec::new();

        if let Some(c) = self.center_id {
            clause.push_str(&format!(" AND {alias}.center_id = ?"));
            values.push(c);
        }
        if let Some(c) = self.classroom_id {
            clause.push_str(&format!(" AND {alias}.classroom_id = ?"));
            values.push(c);
        }
        (clause, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_adds_nothing() {
        let (sql, values) = PlacementFilter::default().sql("s");
        assert!(sql.is_empty());
        assert!(values.is_empty());

        let (sql, values) = PlacementFilter::new(Some(1), Some(2)).sql("s");
        assert_eq!(sql, " AND s.center_id = ? AND s.classroom_id = ?");
        assert_eq!(values, vec![1, 2]);
    }
}
