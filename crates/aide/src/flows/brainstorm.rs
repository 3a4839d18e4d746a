use serde::{Deserialize, Serialize};

use super::{require_non_blank, run_flow};
use crate::errors::{FlowError, FlowResult};
use crate::providers::base::Provider;

pub const DEFAULT_IDEA_COUNT: usize = 5;
pub const MAX_IDEA_COUNT: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainstormRequest {
    pub topic: String,
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    DEFAULT_IDEA_COUNT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct IdeaList {
    ideas: Vec<Idea>,
}

/// Ask for `count` ideas. Extra ideas beyond the count are dropped.
pub async fn brainstorm(provider: &dyn Provider, request: &BrainstormRequest) -> FlowResult<Vec<Idea>> {
    require_non_blank("topic", &request.topic)?;
    if request.count == 0 || request.count > MAX_IDEA_COUNT {
        return Err(FlowError::InvalidRequest(format!(
            "count must be between 1 and {}",
            MAX_IDEA_COUNT
        )));
    }

    let list: IdeaList = run_flow(provider, "brainstorm.md", request).await?;
    let mut ideas = list.ideas;
    ideas.truncate(request.count);
    Ok(ideas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::MockProvider;

    #[tokio::test]
    async fn test_brainstorm_truncates_to_count() {
        let provider = MockProvider::new(vec![
            r#"{"ideas": [
                {"title": "Picnic", "description": "Lunch in the park."},
                {"title": "Escape room", "description": "Solve puzzles together."},
                {"title": "Cooking class"}
            ]}"#,
        ]);
        let request = BrainstormRequest {
            topic: "team offsite".to_string(),
            count: 2,
        };

        let ideas = brainstorm(&provider, &request).await.unwrap();
        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0].title, "Picnic");
        assert!(provider.prompts()[0].contains("Come up with 2 distinct ideas about: team offsite"));
    }

    #[tokio::test]
    async fn test_count_bounds() {
        let provider = MockProvider::new(Vec::<String>::new());
        for count in [0, MAX_IDEA_COUNT + 1] {
            let request = BrainstormRequest {
                topic: "names for a cat".to_string(),
                count,
            };
            assert!(matches!(
                brainstorm(&provider, &request).await,
                Err(FlowError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_count_defaults() {
        let request: BrainstormRequest =
            serde_json::from_str(r#"{"topic": "weekend plans"}"#).unwrap();
        assert_eq!(request.count, DEFAULT_IDEA_COUNT);
    }
}
