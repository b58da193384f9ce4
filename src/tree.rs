// 🌳 Selection Tree - record of every question, choice and result
//
// Steps live in an arena and point at their parent by id. A play-through
// only ever produces one chain, but nothing here assumes that.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepId(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionStep {
    pub question: String,
    pub choices: Vec<String>,
    /// Park names that survived this step, in order
    pub result_set: Vec<String>,
    pub parent: Option<StepId>,
}

impl SelectionStep {
    /// One-line summary used by `render`
    pub fn summary(&self) -> String {
        let parks = match self.result_set.len() {
            0 => "no parks".to_string(),
            1 => "1 park".to_string(),
            n => format!("{} parks", n),
        };

        format!("{}: {} → {}", self.question, self.choices.join(", "), parks)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionTree {
    steps: Vec<SelectionStep>,
}

impl SelectionTree {
    pub fn new() -> Self {
        SelectionTree { steps: Vec::new() }
    }

    /// Add a step under `parent` (None for a root). Existing steps never change.
    ///
    /// A parent id that does not belong to this tree is treated as no parent.
    pub fn append(
        &mut self,
        parent: Option<StepId>,
        question: &str,
        choices: Vec<String>,
        result_set: Vec<String>,
    ) -> StepId {
        let parent = parent.filter(|id| id.0 < self.steps.len());
        self.steps.push(SelectionStep {
            question: question.to_string(),
            choices,
            result_set,
            parent,
        });
        StepId(self.steps.len() - 1)
    }

    pub fn get(&self, id: StepId) -> Option<&SelectionStep> {
        self.steps.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<StepId> {
        self.steps.len().checked_sub(1).map(StepId)
    }

    fn children(&self, parent: Option<StepId>) -> impl Iterator<Item = StepId> + '_ {
        self.steps
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.parent == parent)
            .map(|(i, _)| StepId(i))
    }

    /// Depth-first `(depth, summary)` rows, roots and siblings in insertion order
    pub fn render(&self) -> Vec<(usize, String)> {
        let mut rows = Vec::with_capacity(self.steps.len());
        let mut stack: Vec<(StepId, usize)> = self.children(None).map(|id| (id, 0)).collect();
        stack.reverse();

        while let Some((id, depth)) = stack.pop() {
            if let Some(step) = self.get(id) {
                rows.push((depth, step.summary()));
            }
            let mut kids: Vec<_> = self.children(Some(id)).map(|c| (c, depth + 1)).collect();
            kids.reverse();
            stack.extend(kids);
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_linear_chain_render() {
        let mut tree = SelectionTree::new();
        let state = tree.append(None, "Select State", names(&["CA"]), names(&["A", "B", "C"]));
        let topics = tree.append(
            Some(state),
            "Selected Topics",
            names(&["Fire", "Geology"]),
            names(&["A", "B"]),
        );
        let last = tree.append(Some(topics), "Selected Activities", names(&["Hiking"]), names(&["A"]));

        assert_eq!(tree.last(), Some(last));
        assert_eq!(tree.get(last).and_then(|s| s.parent), Some(topics));

        let rows = tree.render();
        assert_eq!(
            rows,
            vec![
                (0, "Select State: CA → 3 parks".to_string()),
                (1, "Selected Topics: Fire, Geology → 2 parks".to_string()),
                (2, "Selected Activities: Hiking → 1 park".to_string()),
            ]
        );

        println!("✅ Selection chain render test PASSED");
    }

    #[test]
    fn test_single_step_chain() {
        let mut tree = SelectionTree::new();
        let only = tree.append(None, "Select State", names(&["ME"]), names(&["Acadia National Park"]));

        assert_eq!(tree.get(only).and_then(|s| s.parent), None);
        assert_eq!(tree.render(), vec![(0, "Select State: ME → 1 park".to_string())]);
    }

    #[test]
    fn test_branches_render_depth_first() {
        let mut tree = SelectionTree::new();
        let root = tree.append(None, "Q0", names(&["a"]), names(&[]));
        let left = tree.append(Some(root), "Q1", names(&["b"]), names(&[]));
        tree.append(Some(root), "Q2", names(&["c"]), names(&[]));
        tree.append(Some(left), "Q3", names(&["d"]), names(&[]));

        let rows: Vec<(usize, String)> = tree
            .render()
            .into_iter()
            .map(|(d, text)| (d, text.split(':').next().unwrap().to_string()))
            .collect();

        assert_eq!(
            rows,
            vec![
                (0, "Q0".to_string()),
                (1, "Q1".to_string()),
                (2, "Q3".to_string()),
                (1, "Q2".to_string()),
            ]
        );
    }

    #[test]
    fn test_append_never_mutates_existing() {
        let mut tree = SelectionTree::new();
        let first = tree.append(None, "Q", names(&["x"]), names(&["P"]));
        let before = tree.get(first).cloned();

        tree.append(Some(first), "Q2", names(&["y"]), names(&[]));

        assert_eq!(tree.get(first).cloned(), before);
        assert_eq!(tree.get(first).unwrap().summary(), "Q: x → 1 park");
    }
}
