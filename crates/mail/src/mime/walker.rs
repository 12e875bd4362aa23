//! Recursive descent over a MIME part tree

use serde::{Deserialize, Serialize};

use super::part::{Extracted, process_part};
use crate::error::MailError;
use crate::gmail::api::MessagePart;

/// Deepest container nesting accepted before the walk fails closed
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// How bodies found under `multipart/alternative` are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyPolicy {
    /// Concatenate every html and text leaf in tree order, alternatives included
    #[default]
    Concatenate,
    /// Within an alternative, keep only the first branch with HTML,
    /// falling back to the first branch with plain text
    PreferHtml,
}

/// Walks a part tree and merges leaf contributions in depth-first order
#[derive(Debug, Clone, Copy)]
pub struct PartsWalker {
    max_depth: usize,
    policy: BodyPolicy,
}

impl Default for PartsWalker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH, BodyPolicy::default())
    }
}

impl PartsWalker {
    pub fn new(max_depth: usize, policy: BodyPolicy) -> Self {
        Self { max_depth, policy }
    }

    /// Walk a part (usually the message payload) and collect its content
    pub fn walk(&self, part: &MessagePart) -> Result<Extracted, MailError> {
        let mut out = Extracted::default();
        self.walk_into(part, 0, &mut out)?;
        Ok(out)
    }

    fn walk_into(
        &self,
        part: &MessagePart,
        depth: usize,
        out: &mut Extracted,
    ) -> Result<(), MailError> {
        let children = part.children();

        // `parts: []` is a leaf, same as no `parts` at all
        if children.is_empty() {
            process_part(part, out);
            return Ok(());
        }

        if depth >= self.max_depth {
            return Err(MailError::NestingTooDeep {
                limit: self.max_depth,
            });
        }

        if self.policy == BodyPolicy::PreferHtml
            && part.mime_type().eq_ignore_ascii_case("multipart/alternative")
        {
            return self.walk_alternative(children, depth + 1, out);
        }

        for child in children {
            self.walk_into(child, depth + 1, out)?;
        }
        Ok(())
    }

    fn walk_alternative(
        &self,
        children: &[MessagePart],
        depth: usize,
        out: &mut Extracted,
    ) -> Result<(), MailError> {
        let branches = children
            .iter()
            .map(|child| {
                let mut branch = Extracted::default();
                self.walk_into(child, depth, &mut branch)?;
                Ok(branch)
            })
            .collect::<Result<Vec<_>, MailError>>()?;

        let chosen = branches
            .iter()
            .position(|b| !b.html.is_empty())
            .or_else(|| branches.iter().position(|b| !b.text.is_empty()));

        for (index, branch) in branches.into_iter().enumerate() {
            if Some(index) == chosen {
                out.append(branch);
            } else {
                out.append_attachments(branch);
            }
        }
        Ok(())
    }
}
