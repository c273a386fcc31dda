use anyhow::Context;
use kev_config::{ExplicitOverrides, KevConfig};
use kev_core::ServiceLimits;
use kev_devops::{ClientSettings, DevOpsClient, RenderSession};

use crate::cli::{Commands, GlobalFlags};

/// Load configuration: `.env`, then secret store values, then the figment
/// chain, with `explicit` on top.
pub async fn load_config(explicit: &ExplicitOverrides) -> anyhow::Result<KevConfig> {
    let secrets = match kev_secrets::load_overrides().await {
        Ok(overrides) => overrides.into_values(),
        Err(error) => {
            if is_ci() {
                return Err(anyhow::anyhow!(
                    "failed to load configured secret backend in CI: {error}"
                ));
            }

            tracing::warn!(%error, "failed to load secrets; continuing with local config");
            Vec::new()
        }
    };

    KevConfig::load_with_dotenv(&secrets, explicit).context("failed to load kevops configuration")
}

fn is_ci() -> bool {
    std::env::var("CI").is_ok_and(|value| value.eq_ignore_ascii_case("true"))
}

/// Connection values given on the command line. Positional values on `tasks`
/// win over the global flags.
#[must_use]
pub fn explicit_overrides(command: &Commands, flags: &GlobalFlags) -> ExplicitOverrides {
    let mut explicit = ExplicitOverrides {
        organization_url: flags.org_url.clone(),
        project: flags.project.clone(),
        pat: flags.pat.clone(),
        ..ExplicitOverrides::default()
    };
    if let Commands::Tasks(args) = command {
        explicit.organization_url = args
            .organization_url
            .clone()
            .or(explicit.organization_url);
        explicit.project = args.project_name.clone().or(explicit.project);
        explicit.pat = args.token.clone().or(explicit.pat);
        explicit.area_paths.clone_from(&args.areas);
        explicit.mine = args.mine;
    }
    explicit
}

/// Everything a networked command needs.
pub struct AppContext {
    pub config: KevConfig,
    pub limits: ServiceLimits,
    pub session: RenderSession,
}

impl AppContext {
    /// Validate credentials and limits, then build the client. No request
    /// is made here.
    pub fn connect(config: KevConfig) -> anyhow::Result<Self> {
        let credentials = config.azure.credentials()?;
        let limits = config.limits.service_limits()?;
        let settings = ClientSettings {
            timeout: std::time::Duration::from_secs(config.azure.timeout_secs),
            api_version: config.azure.api_version.clone(),
        };
        tracing::debug!(?credentials, ?limits, "connecting");
        let client =
            DevOpsClient::new(credentials, settings).context("failed to build HTTP client")?;
        Ok(Self {
            config,
            limits,
            session: RenderSession::for_client(client, limits),
        })
    }

    #[must_use]
    pub fn organization_url(&self) -> &str {
        &self.session.scope().organization_url
    }

    #[must_use]
    pub fn project(&self) -> &str {
        &self.session.scope().project
    }
}
