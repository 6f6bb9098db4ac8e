use std::collections::BTreeSet;

/// Users and access points whose series are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    users: BTreeSet<usize>,
    access_points: BTreeSet<usize>,
    user_count: usize,
    access_point_count: usize,
}

impl SelectionState {
    /// Everything selected.
    pub fn all(user_count: usize, access_point_count: usize) -> Self {
        Self {
            users: (0..user_count).collect(),
            access_points: (0..access_point_count).collect(),
            user_count,
            access_point_count,
        }
    }

    pub fn user_count(&self) -> usize {
        self.user_count
    }

    pub fn access_point_count(&self) -> usize {
        self.access_point_count
    }

    pub fn users(&self) -> impl Iterator<Item = usize> + '_ {
        self.users.iter().copied()
    }

    pub fn access_points(&self) -> impl Iterator<Item = usize> + '_ {
        self.access_points.iter().copied()
    }

    pub fn is_user_selected(&self, user: usize) -> bool {
        self.users.contains(&user)
    }

    pub fn is_access_point_selected(&self, ap: usize) -> bool {
        self.access_points.contains(&ap)
    }

    pub fn toggle_user(&mut self, user: usize) {
        if user >= self.user_count {
            return;
        }
        if !self.users.remove(&user) {
            self.users.insert(user);
        }
    }

    pub fn toggle_access_point(&mut self, ap: usize) {
        if ap >= self.access_point_count {
            return;
        }
        if !self.access_points.remove(&ap) {
            self.access_points.insert(ap);
        }
    }

    /// Replaces the user selection; out-of-range indices are dropped.
    pub fn set_users<I: IntoIterator<Item = usize>>(&mut self, users: I) {
        let limit = self.user_count;
        self.users = users.into_iter().filter(|u| *u < limit).collect();
    }

    pub fn set_access_points<I: IntoIterator<Item = usize>>(&mut self, aps: I) {
        let limit = self.access_point_count;
        self.access_points = aps.into_iter().filter(|a| *a < limit).collect();
    }

    pub fn select_all_users(&mut self) {
        self.users = (0..self.user_count).collect();
    }

    pub fn deselect_all_users(&mut self) {
        self.users.clear();
    }

    pub fn select_all_access_points(&mut self) {
        self.access_points = (0..self.access_point_count).collect();
    }

    pub fn deselect_all_access_points(&mut self) {
        self.access_points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_and_bulk_actions() {
        let mut selection = SelectionState::all(3, 2);
        selection.toggle_user(1);
        assert_eq!(selection.users().collect::<Vec<_>>(), vec![0, 2]);
        selection.toggle_user(1);
        selection.toggle_user(7);
        assert_eq!(selection.users().count(), 3);

        selection.deselect_all_access_points();
        assert_eq!(selection.access_points().count(), 0);
        selection.select_all_access_points();
        assert!(selection.is_access_point_selected(1));
    }

    #[test]
    fn set_users_drops_unknown_indices() {
        let mut selection = SelectionState::all(2, 1);
        selection.set_users([1, 5]);
        assert_eq!(selection.users().collect::<Vec<_>>(), vec![1]);
    }
}
