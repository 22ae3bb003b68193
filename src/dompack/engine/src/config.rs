use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable with path to config file
pub const CONFIG_ENV: &str = "DOMPACK_CONFIG";

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub usaco: UsacoConfig,
    #[serde(default)]
    pub polygon: PolygonConfig,
}

impl Config {
    /// Loads config from `path`, or from file in `DOMPACK_CONFIG`.
    /// Defaults are used if neither is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        };
        let path = match path {
            Some(p) => p,
            None => return Ok(Config::default()),
        };
        let data = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Config::parse(&data).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(data: &str) -> anyhow::Result<Config> {
        Ok(toml::from_str(data)?)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
pub struct UsacoConfig {
    /// Site entry point; contest and problem pages are queries to it
    #[serde(default = "UsacoConfig::default_site_url")]
    pub site_url: String,
    /// Directory with test data archives
    #[serde(default = "UsacoConfig::default_data_url")]
    pub data_url: String,
    /// Where downloaded archives are kept between runs
    #[serde(default = "UsacoConfig::default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Output directory, each problem goes to `<problems-dir>/<letter>`
    #[serde(default = "UsacoConfig::default_problems_dir")]
    pub problems_dir: PathBuf,
    /// Files from here are rendered into every problem directory
    #[serde(default = "UsacoConfig::default_template_dir")]
    pub template_dir: PathBuf,
    /// How many contests or problems are processed simultaneously
    #[serde(default = "UsacoConfig::default_workers")]
    pub workers: usize,
}

impl UsacoConfig {
    fn default_site_url() -> String {
        "http://usaco.org/index.php".to_string()
    }

    fn default_data_url() -> String {
        "http://www.usaco.org/current/data".to_string()
    }

    fn default_cache_dir() -> PathBuf {
        PathBuf::from("data_cache")
    }

    fn default_problems_dir() -> PathBuf {
        PathBuf::from("problems")
    }

    fn default_template_dir() -> PathBuf {
        PathBuf::from("template")
    }

    fn default_workers() -> usize {
        20
    }

    pub fn contest_url(&self, contest: &str) -> String {
        format!("{}?page={}", self.site_url, contest)
    }

    pub fn problem_url(&self, problem_id: u32) -> String {
        format!("{}?page=viewproblem2&cpid={}", self.site_url, problem_id)
    }

    pub fn archive_url(&self, secondary_id: &str) -> String {
        format!("{}/{}.zip", self.data_url, secondary_id)
    }

    pub fn archive_path(&self, secondary_id: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.zip", secondary_id))
    }
}

impl Default for UsacoConfig {
    fn default() -> Self {
        UsacoConfig {
            site_url: UsacoConfig::default_site_url(),
            data_url: UsacoConfig::default_data_url(),
            cache_dir: UsacoConfig::default_cache_dir(),
            problems_dir: UsacoConfig::default_problems_dir(),
            template_dir: UsacoConfig::default_template_dir(),
            workers: UsacoConfig::default_workers(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
pub struct PolygonConfig {
    /// testlib.h copied next to checker.
    /// By default taken from package (`files/testlib.h`)
    #[serde(default)]
    pub testlib: Option<PathBuf>,
    /// Template of contest-wide `common.tex`, `$contest_name$` is substituted.
    /// Bundled template is used if unset
    #[serde(default)]
    pub common_tex: Option<PathBuf>,
    /// Target of `problem_statement/olymp.sty` symlink
    #[serde(default = "PolygonConfig::default_olymp_sty_link")]
    pub olymp_sty_link: PathBuf,
}

impl PolygonConfig {
    fn default_olymp_sty_link() -> PathBuf {
        PathBuf::from("../../../olymp.sty/olymp.sty")
    }
}

impl Default for PolygonConfig {
    fn default() -> Self {
        PolygonConfig {
            testlib: None,
            common_tex: None,
            olymp_sty_link: PolygonConfig::default_olymp_sty_link(),
        }
    }
}
