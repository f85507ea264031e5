//! GitHub API client
//!
//! One blocking client for both API surfaces: REST for git refs, server-side
//! merges, and repository settings; GraphQL for branch protection rules and
//! ref listing. In dry mode every mutation is echoed instead of sent, and
//! reads return placeholder data so a dry run logs the full sequence without
//! touching the network.

use std::collections::BTreeMap;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::core::channel::PROTECTED_BRANCH_PATTERNS;
use crate::core::error::{BumpResult, HostError};
use crate::core::ports::{ProtectionSettings, RepositoryHost};

const API_ROOT: &str = "https://api.github.com";
const DRY_SHA: &str = "0000000000000000000000000000000000000000";

pub struct GitHubClient {
  http: Client,
  owner: String,
  repo: String,
  token: String,
  dry: bool,
}

#[derive(Deserialize)]
struct RefObject {
  sha: String,
}

#[derive(Deserialize)]
struct RefData {
  object: RefObject,
}

#[derive(Deserialize)]
struct GraphqlResponse {
  data: Option<serde_json::Value>,
  errors: Option<serde_json::Value>,
}

impl GitHubClient {
  pub fn new(token: &str, owner: &str, repo: &str, dry: bool) -> BumpResult<Self> {
    let http = Client::builder().user_agent("channel-bump").build()?;
    Ok(Self {
      http,
      owner: owner.to_string(),
      repo: repo.to_string(),
      token: token.to_string(),
      dry,
    })
  }

  fn repo_url(&self, path: &str) -> String {
    if path.is_empty() {
      format!("{}/repos/{}/{}", API_ROOT, self.owner, self.repo)
    } else {
      format!("{}/repos/{}/{}/{}", API_ROOT, self.owner, self.repo, path)
    }
  }

  fn send(&self, request: reqwest::blocking::RequestBuilder) -> BumpResult<Response> {
    let response = request
      .bearer_auth(&self.token)
      .header("Accept", "application/vnd.github+json")
      .send()?;
    Ok(response)
  }

  /// Execute a GraphQL document and return its `data` payload
  fn graphql(&self, document: &str) -> BumpResult<serde_json::Value> {
    let response = self.send(
      self
        .http
        .post(format!("{}/graphql", API_ROOT))
        .json(&json!({ "query": document })),
    )?;
    let status = response.status();
    if !status.is_success() {
      return Err(
        HostError::UnexpectedStatus {
          operation: "graphql".to_string(),
          status: status.as_u16(),
        }
        .into(),
      );
    }
    let body: GraphqlResponse = response.json()?;
    if let Some(errors) = body.errors {
      return Err(
        HostError::Graphql {
          reason: errors.to_string(),
        }
        .into(),
      );
    }
    body.data.ok_or_else(|| {
      HostError::Graphql {
        reason: "empty response data".to_string(),
      }
      .into()
    })
  }

  /// Repository node id and existing protection rule ids by pattern
  fn query_protection_rules(&self) -> BumpResult<(String, BTreeMap<String, String>)> {
    let data = self.graphql(&format!(
      r#"query {{
        repository(owner: "{}", name: "{}") {{
          id
          branchProtectionRules(first: 100) {{
            nodes {{ id pattern }}
          }}
        }}
      }}"#,
      self.owner, self.repo
    ))?;

    let repository = &data["repository"];
    let repo_id = repository["id"]
      .as_str()
      .ok_or_else(|| HostError::Graphql {
        reason: "repository id missing".to_string(),
      })?
      .to_string();

    let mut rule_ids = BTreeMap::new();
    if let Some(nodes) = repository["branchProtectionRules"]["nodes"].as_array() {
      for node in nodes {
        if let (Some(id), Some(pattern)) = (node["id"].as_str(), node["pattern"].as_str()) {
          rule_ids.insert(pattern.to_string(), id.to_string());
        }
      }
    }
    Ok((repo_id, rule_ids))
  }

  fn create_protection_rule(&self, repo_id: &str, pattern: &str) -> BumpResult<String> {
    println!("> creating protection rule for branch name pattern {}", pattern);
    let data = self.graphql(&format!(
      r#"mutation {{
        createBranchProtectionRule(input: {{
          repositoryId: "{}"
          pattern: "{}"
        }}) {{
          branchProtectionRule {{ id }}
        }}
      }}"#,
      repo_id, pattern
    ))?;
    data["createBranchProtectionRule"]["branchProtectionRule"]["id"]
      .as_str()
      .map(str::to_string)
      .ok_or_else(|| {
        HostError::Graphql {
          reason: format!("created rule for {} has no id", pattern),
        }
        .into()
      })
  }
}

impl RepositoryHost for GitHubClient {
  fn get_ref_sha(&self, ref_name: &str) -> BumpResult<String> {
    if self.dry {
      return Ok(DRY_SHA.to_string());
    }
    let response = self.send(self.http.get(self.repo_url(&format!("git/ref/{}", ref_name))))?;
    match response.status() {
      StatusCode::OK => {
        let data: RefData = response.json()?;
        Ok(data.object.sha)
      }
      StatusCode::NOT_FOUND => Err(
        HostError::RefNotFound {
          ref_name: ref_name.to_string(),
        }
        .into(),
      ),
      status => Err(
        HostError::UnexpectedStatus {
          operation: format!("get ref {}", ref_name),
          status: status.as_u16(),
        }
        .into(),
      ),
    }
  }

  fn create_ref(&self, ref_name: &str, sha: &str) -> BumpResult<()> {
    println!("> create ref {} at {}", ref_name, sha);
    if self.dry {
      return Ok(());
    }
    let response = self.send(
      self
        .http
        .post(self.repo_url("git/refs"))
        .json(&json!({ "ref": ref_name, "sha": sha })),
    )?;
    let status = response.status();
    if status != StatusCode::CREATED {
      return Err(
        HostError::UnexpectedStatus {
          operation: format!("create ref {}", ref_name),
          status: status.as_u16(),
        }
        .into(),
      );
    }
    Ok(())
  }

  fn merge_branch(&self, base: &str, head_sha: &str, message: &str) -> BumpResult<()> {
    if self.dry {
      return Ok(());
    }
    let response = self.send(self.http.post(self.repo_url("merges")).json(&json!({
      "base": base,
      "head": head_sha,
      "commit_message": message,
    })))?;
    let status = response.status();
    // 201 created a merge commit; 204 means base already contained head.
    if status != StatusCode::CREATED && status != StatusCode::NO_CONTENT {
      return Err(
        HostError::MergeFailed {
          base: base.to_string(),
          status: status.as_u16(),
        }
        .into(),
      );
    }
    Ok(())
  }

  fn set_default_branch(&self, branch: &str) -> BumpResult<()> {
    println!("> set default branch to {}", branch);
    if self.dry {
      return Ok(());
    }
    let response = self.send(
      self
        .http
        .patch(self.repo_url(""))
        .json(&json!({ "default_branch": branch })),
    )?;
    let status = response.status();
    if status != StatusCode::OK {
      return Err(
        HostError::UnexpectedStatus {
          operation: format!("set default branch to {}", branch),
          status: status.as_u16(),
        }
        .into(),
      );
    }
    Ok(())
  }

  fn latest_dev_branch(&self) -> BumpResult<Option<String>> {
    if self.dry {
      return Ok(None);
    }
    let data = self.graphql(&format!(
      r#"query {{
        repository(owner: "{}", name: "{}") {{
          refs(refPrefix: "refs/heads/dev/", last: 1) {{
            edges {{ node {{ name }} }}
          }}
        }}
      }}"#,
      self.owner, self.repo
    ))?;
    let name = data["repository"]["refs"]["edges"]
      .as_array()
      .and_then(|edges| edges.first())
      .and_then(|edge| edge["node"]["name"].as_str())
      .map(|name| format!("dev/{}", name));
    Ok(name)
  }

  fn protection_rule_ids(&self) -> BumpResult<BTreeMap<String, String>> {
    if self.dry {
      // Placeholder ids keep the dry-run protection log complete.
      return Ok(
        PROTECTED_BRANCH_PATTERNS
          .iter()
          .map(|p| (p.to_string(), "<dry-rule>".to_string()))
          .collect(),
      );
    }
    let (repo_id, mut rule_ids) = self.query_protection_rules()?;
    for pattern in PROTECTED_BRANCH_PATTERNS {
      if !rule_ids.contains_key(pattern) {
        let id = self.create_protection_rule(&repo_id, pattern)?;
        rule_ids.insert(pattern.to_string(), id);
      }
    }
    Ok(rule_ids)
  }

  fn update_protection_rule(&self, rule_id: &str, settings: &ProtectionSettings) -> BumpResult<()> {
    let contexts = serde_json::to_string(&settings.required_status_check_contexts)?;
    let mutation = format!(
      r#"mutation {{
        updateBranchProtectionRule(input: {{
          branchProtectionRuleId: "{}"
          requiresApprovingReviews: {},
          requiredApprovingReviewCount: {},
          dismissesStaleReviews: {},
          restrictsReviewDismissals: {},
          requiresStatusChecks: {},
          requiredStatusCheckContexts: {},
          requiresStrictStatusChecks: {},
          requiresConversationResolution: {},
          isAdminEnforced: {},
          restrictsPushes: {},
          allowsForcePushes: {},
          allowsDeletions: {}
        }}) {{ clientMutationId }}
      }}"#,
      rule_id,
      settings.requires_approving_reviews,
      settings.required_approving_review_count,
      settings.dismisses_stale_reviews,
      settings.restricts_review_dismissals,
      settings.requires_status_checks,
      contexts,
      settings.requires_strict_status_checks,
      settings.requires_conversation_resolution,
      settings.is_admin_enforced,
      settings.restricts_pushes,
      settings.allows_force_pushes,
      settings.allows_deletions,
    );
    if self.dry {
      println!("{}", mutation);
      return Ok(());
    }
    self.graphql(&mutation)?;
    Ok(())
  }

  fn comment_and_close_pr(&self, number: u64, body: &str) -> BumpResult<()> {
    println!("> comment and close pull request #{}", number);
    if self.dry {
      println!("{}", body);
      return Ok(());
    }
    let response = self.send(
      self
        .http
        .post(self.repo_url(&format!("issues/{}/comments", number)))
        .json(&json!({ "body": body })),
    )?;
    let status = response.status();
    if status != StatusCode::CREATED {
      return Err(
        HostError::UnexpectedStatus {
          operation: format!("comment on pull request #{}", number),
          status: status.as_u16(),
        }
        .into(),
      );
    }

    let response = self.send(
      self
        .http
        .patch(self.repo_url(&format!("pulls/{}", number)))
        .json(&json!({ "state": "closed" })),
    )?;
    let status = response.status();
    if status != StatusCode::OK {
      return Err(
        HostError::UnexpectedStatus {
          operation: format!("close pull request #{}", number),
          status: status.as_u16(),
        }
        .into(),
      );
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dry_client_reads_placeholders_without_network() {
    let client = GitHubClient::new("token", "acme", "widget", true).unwrap();
    assert_eq!(client.get_ref_sha("tags/v1.2-alpha").unwrap(), DRY_SHA);
    assert_eq!(client.latest_dev_branch().unwrap(), None);
    let rules = client.protection_rule_ids().unwrap();
    assert_eq!(rules.len(), PROTECTED_BRANCH_PATTERNS.len());
  }

  #[test]
  fn dry_client_logs_mutations_without_network() {
    let client = GitHubClient::new("token", "acme", "widget", true).unwrap();
    client.create_ref("refs/heads/alpha/v1/v1.2", DRY_SHA).unwrap();
    client.merge_branch("alpha/v1/v1.2", DRY_SHA, "message").unwrap();
    client.set_default_branch("dev/v1/v1.2").unwrap();
    client
      .update_protection_rule("<dry-rule>", &crate::github::protection::suspended_settings())
      .unwrap();
    client.comment_and_close_pr(7, "body").unwrap();
  }

  #[test]
  fn repo_url_nests_under_the_repository() {
    let client = GitHubClient::new("token", "acme", "widget", true).unwrap();
    assert_eq!(
      client.repo_url("git/ref/tags/v1"),
      "https://api.github.com/repos/acme/widget/git/ref/tags/v1"
    );
  }
}
