//! Department tree derived from `parent_id` references.
//!
//! Departments only store their parent. Children are looked up through a
//! [`DepartmentIndex`] built per request, so no record owns another.

use std::collections::{HashMap, HashSet};

use crate::models::{Department, DepartmentNode, DepartmentSummary, DepartmentView};

/// Lookup tables over a snapshot of all departments.
pub struct DepartmentIndex<'a> {
    by_id: HashMap<i64, &'a Department>,
    children: HashMap<i64, Vec<&'a Department>>,
    /// Input order, preserved for roots
    order: Vec<&'a Department>,
}

impl<'a> DepartmentIndex<'a> {
    /// Index `departments`; children keep the relative order of the input slice.
    pub fn new(departments: &'a [Department]) -> Self {
        let mut by_id = HashMap::with_capacity(departments.len());
        let mut children: HashMap<i64, Vec<&'a Department>> = HashMap::new();

        for department in departments {
            by_id.insert(department.id, department);
            if let Some(parent_id) = department.parent_id {
                children.entry(parent_id).or_default().push(department);
            }
        }

        Self {
            by_id,
            children,
            order: departments.iter().collect(),
        }
    }

    pub fn get(&self, id: i64) -> Option<&'a Department> {
        self.by_id.get(&id).copied()
    }

    /// Direct children of `id`.
    pub fn children_of(&self, id: i64) -> &[&'a Department] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Departments without a parent.
    pub fn roots(&self) -> impl Iterator<Item = &'a Department> + '_ {
        self.order.iter().copied().filter(|d| d.parent_id.is_none())
    }

    /// Department with its parent and direct children attached.
    pub fn view(&self, department: &Department) -> DepartmentView {
        DepartmentView {
            department: department.clone(),
            parent: department
                .parent_id
                .and_then(|id| self.get(id))
                .map(Department::summary),
            children: self
                .children_of(department.id)
                .iter()
                .map(|child| child.summary())
                .collect::<Vec<DepartmentSummary>>(),
        }
    }

    /// Views for every indexed department, in input order.
    pub fn views(&self) -> Vec<DepartmentView> {
        self.order.iter().map(|d| self.view(d)).collect()
    }

    /// Root departments, each with its complete subtree.
    pub fn forest(&self) -> Vec<DepartmentNode> {
        let mut visited = HashSet::new();
        self.roots()
            .map(|root| self.subtree(root, &mut visited))
            .collect()
    }

    fn subtree(&self, department: &Department, visited: &mut HashSet<i64>) -> DepartmentNode {
        visited.insert(department.id);
        let mut children = Vec::new();
        for child in self.children_of(department.id) {
            // A cycle can only come from hand-edited rows; cut it rather than recurse forever
            if visited.contains(&child.id) {
                continue;
            }
            children.push(self.subtree(child, visited));
        }

        DepartmentNode {
            department: department.clone(),
            children,
        }
    }

    /// Whether `candidate` lies in the subtree rooted at `ancestor` (inclusive).
    pub fn is_in_subtree(&self, ancestor: i64, candidate: i64) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(candidate);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            if !seen.insert(id) {
                return false;
            }
            current = self.get(id).and_then(|d| d.parent_id);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dept(id: i64, code: &str, parent_id: Option<i64>) -> Department {
        Department {
            id,
            code: code.to_string(),
            full_name: format!("Department {}", code),
            abbreviation: code.to_string(),
            creation_date: None,
            liquidation_date: None,
            parent_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Department> {
        vec![
            dept(1, "0001", None),
            dept(2, "0002", Some(1)),
            dept(3, "0003", Some(2)),
            dept(4, "0004", None),
            dept(5, "0005", Some(1)),
        ]
    }

    #[test]
    fn test_roots_in_input_order() {
        let departments = sample();
        let index = DepartmentIndex::new(&departments);
        let roots: Vec<i64> = index.roots().map(|d| d.id).collect();
        assert_eq!(roots, vec![1, 4]);
    }

    #[test]
    fn test_view_attaches_parent_and_children() {
        let departments = sample();
        let index = DepartmentIndex::new(&departments);

        let view = index.view(index.get(1).unwrap());
        assert!(view.parent.is_none());
        let child_ids: Vec<i64> = view.children.iter().map(|c| c.id).collect();
        assert_eq!(child_ids, vec![2, 5]);

        let view = index.view(index.get(3).unwrap());
        assert_eq!(view.parent.unwrap().id, 2);
        assert!(view.children.is_empty());
    }

    #[test]
    fn test_forest_nests_full_subtrees() {
        let departments = sample();
        let index = DepartmentIndex::new(&departments);
        let forest = index.forest();

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].department.id, 1);
        assert_eq!(forest[0].children.len(), 2);
        assert_eq!(forest[0].children[0].department.id, 2);
        assert_eq!(forest[0].children[0].children[0].department.id, 3);
        assert!(forest[1].children.is_empty());
    }

    #[test]
    fn test_orphaned_parent_reference_is_not_a_root() {
        let departments = vec![dept(1, "0001", None), dept(2, "0002", Some(99))];
        let index = DepartmentIndex::new(&departments);
        let forest = index.forest();
        assert_eq!(forest.len(), 1);
        assert!(index.view(index.get(2).unwrap()).parent.is_none());
    }

    #[test]
    fn test_is_in_subtree() {
        let departments = sample();
        let index = DepartmentIndex::new(&departments);
        assert!(index.is_in_subtree(1, 3));
        assert!(index.is_in_subtree(2, 2));
        assert!(!index.is_in_subtree(3, 1));
        assert!(!index.is_in_subtree(4, 3));
    }

    #[test]
    fn test_is_in_subtree_terminates_on_cycle() {
        let departments = vec![dept(1, "0001", Some(2)), dept(2, "0002", Some(1))];
        let index = DepartmentIndex::new(&departments);
        assert!(!index.is_in_subtree(3, 1));
        assert!(index.forest().is_empty());
    }
}
