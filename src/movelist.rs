use crate::evaluation::Score;
use crate::r#move::Move;
use arrayvec::ArrayVec;

/// Twelve kings with branching capture chains stay well below this
pub const MAX_MOVELIST_CAPACITY: usize = 256;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoveList(ArrayVec<Move, MAX_MOVELIST_CAPACITY>);
impl MoveList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn push(&mut self, m: Move) {
        self.0.push(m)
    }
    pub fn get(&self, i: usize) -> Option<&Move> {
        self.0.get(i)
    }
    pub fn first(&self) -> Option<&Move> {
        self.0.first()
    }
    pub fn contains(&self, m: &Move) -> bool {
        self.0.contains(m)
    }
    pub fn extend<I: IntoIterator<Item = Move>>(&mut self, moves: I) {
        for m in moves {
            self.push(m)
        }
    }

    pub fn best_first_iter<F: Fn(&Move) -> Score>(
        &self,
        scoring_function: &F,
    ) -> ScoredMoveListIter {
        ScoredMoveListIter::new(self, scoring_function)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.0.iter()
    }

    pub fn to_vec(&self) -> Vec<Move> {
        self.0.to_vec()
    }
}
impl From<Vec<Move>> for MoveList {
    fn from(v: Vec<Move>) -> Self {
        let mut mv_list = MoveList::default();
        mv_list.extend(v);
        mv_list
    }
}
impl std::fmt::Display for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        let mut s = String::new();
        for m in self.0.iter() {
            s.push_str(&format!("{} ", m))
        }
        write!(f, "{}", s.trim())
    }
}
impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = arrayvec::IntoIter<Move, MAX_MOVELIST_CAPACITY>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// A way to iterate through a movelist while scoring
// moves, to potentially reduce search space.
// Equal scores come out in list order
pub struct ScoredMoveListIter<'a> {
    moves: ArrayVec<&'a Move, MAX_MOVELIST_CAPACITY>,
    scores: ArrayVec<Score, MAX_MOVELIST_CAPACITY>,
}
impl<'a> ScoredMoveListIter<'a> {
    pub fn new<F: Fn(&Move) -> Score>(move_list: &'a MoveList, scoring_function: &F) -> Self {
        let mut moves = ArrayVec::new();
        let mut scores = ArrayVec::new();
        for mv in move_list {
            let score = scoring_function(mv);
            scores.push(score);
            moves.push(mv);
        }
        ScoredMoveListIter { moves, scores }
    }
}
impl<'a> Iterator for ScoredMoveListIter<'a> {
    type Item = &'a Move;

    fn next(&mut self) -> Option<Self::Item> {
        if self.moves.is_empty() {
            return None;
        }
        let (mut best_index, mut best_score) = (0, self.scores[0]);
        for (i, s) in self.scores.iter().enumerate() {
            if *s > best_score {
                best_score = *s;
                best_index = i;
            }
        }

        self.scores.remove(best_index);
        Some(self.moves.remove(best_index))
    }
}

#[cfg(test)]
mod tests {
    use super::MoveList;
    use crate::r#move::Move;

    #[test]
    fn best_first_is_stable_on_ties() {
        let list = MoveList::from(vec![
            Move::new_quiet(40, 33),
            Move::new_quiet(42, 33),
            Move::new_quiet(42, 35),
        ]);
        let order: Vec<_> = list
            .best_first_iter(&|m: &Move| if m.to == 35 { 1 } else { 0 })
            .map(|m| m.from * 100 + m.to)
            .collect();
        assert_eq!(order, vec![4235, 4033, 4233]);
    }
}
