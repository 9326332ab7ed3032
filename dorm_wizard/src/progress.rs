//! Step progress classification for a progress bar

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    Completed,
    Active,
    Pending,
}

impl StepState {
    pub fn classify(index: usize, current: usize) -> Self {
        match index.cmp(&current) {
            std::cmp::Ordering::Less => StepState::Completed,
            std::cmp::Ordering::Equal => StepState::Active,
            std::cmp::Ordering::Greater => StepState::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressStep<L> {
    pub index: usize,
    pub label: L,
    pub state: StepState,
}

/// Line between step `from` and step `from + 1`; filled once `from` is completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Connector {
    pub from: usize,
    pub filled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress<L> {
    pub steps: Vec<ProgressStep<L>>,
    pub connectors: Vec<Connector>,
}

impl<L> Progress<L> {
    pub fn active(&self) -> Option<&ProgressStep<L>> {
        self.steps.iter().find(|step| step.state == StepState::Active)
    }

    pub fn completed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.state == StepState::Completed)
            .count()
    }
}

/// Classify every step against the current index
pub fn progress<L, I>(steps: I, current: usize) -> Progress<L>
where
    I: IntoIterator<Item = L>,
{
    let steps: Vec<ProgressStep<L>> = steps
        .into_iter()
        .enumerate()
        .map(|(index, label)| ProgressStep {
            index,
            label,
            state: StepState::classify(index, current),
        })
        .collect();

    let connectors = (1..steps.len())
        .map(|next| Connector {
            from: next - 1,
            filled: next - 1 < current,
        })
        .collect();

    Progress { steps, connectors }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let progress = progress(["Guest", "Guardian", "Stay", "Summary"], 2);

        let states: Vec<StepState> = progress.steps.iter().map(|s| s.state).collect();
        assert_eq!(
            states,
            vec![
                StepState::Completed,
                StepState::Completed,
                StepState::Active,
                StepState::Pending,
            ]
        );
        assert_eq!(progress.active().map(|s| s.label), Some("Stay"));
        assert_eq!(progress.completed_count(), 2);
    }

    #[test]
    fn test_connectors() {
        let progress = progress(["a", "b", "c"], 1);

        assert_eq!(progress.connectors.len(), 2);
        assert!(progress.connectors[0].filled);
        assert!(!progress.connectors[1].filled);
    }

    #[test]
    fn test_empty_step_list() {
        let progress = progress(Vec::<&str>::new(), 0);
        assert!(progress.steps.is_empty());
        assert!(progress.connectors.is_empty());
        assert!(progress.active().is_none());
    }
}
