use crate::config::{validate, Options, TransportOptions};
use crate::cookies::CookieStore;
use crate::proxy::ProxyRotator;
use crate::{FetchError, ProxyError};
use reqwest::header::{REFERER, USER_AGENT};
use reqwest::{redirect::Policy, Client, Proxy, Response};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use url::Url;

/// User agent sent when the options leave it unset
pub const DEFAULT_USER_AGENT: &str = "fetch";

/// HTTP client that rotates proxies and keeps per-domain cookies
///
/// The rotator and cookie store are injected so several clients (for
/// example one per user agent) can share rotation and cookie state.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use sumi_fetch::{CookieStore, FetchClient, Options, ProxyRotator};
///
/// # async fn example() -> sumi_fetch::Result<()> {
/// let proxies = Arc::new(ProxyRotator::new());
/// let cookies = Arc::new(CookieStore::new());
/// let client = FetchClient::new(Options::default(), proxies, cookies)?;
///
/// let response = client.get("https://example.com/", None).await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FetchClient {
    user_agent: String,
    transport: TransportOptions,
    proxies: Arc<ProxyRotator>,
    cookies: Arc<CookieStore>,
    direct: Client,
    proxied: Mutex<HashMap<Url, Client>>,
}

impl FetchClient {
    /// Creates a client bound to a shared proxy rotator and cookie store
    ///
    /// The options are validated first. When they name a proxy file or
    /// cookie directory these are loaded into the shared instances; any load
    /// failure aborts construction. A missing or empty user agent falls back
    /// to [`DEFAULT_USER_AGENT`].
    ///
    /// # Returns
    ///
    /// * `Ok(FetchClient)` - Ready to issue requests
    /// * `Err(FetchError)` - Loading proxies/cookies or building the transport failed
    pub fn new(
        options: Options,
        proxies: Arc<ProxyRotator>,
        cookies: Arc<CookieStore>,
    ) -> Result<Self, FetchError> {
        validate(&options)?;

        if let Some(path) = &options.proxy_file {
            proxies.load(path)?;
        }
        if let Some(dir) = &options.cookie_dir {
            cookies.load_dir(dir)?;
        }

        let user_agent = options
            .user_agent
            .filter(|ua| !ua.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let direct = build_http_client(&options.transport, &cookies, None)?;

        Ok(Self {
            user_agent,
            transport: options.transport,
            proxies,
            cookies,
            direct,
            proxied: Mutex::new(HashMap::new()),
        })
    }

    /// Creates a client with its own, unshared rotator and cookie store
    pub fn standalone(options: Options) -> Result<Self, FetchError> {
        Self::new(
            options,
            Arc::new(ProxyRotator::new()),
            Arc::new(CookieStore::new()),
        )
    }

    /// Issues a GET request
    ///
    /// The next proxy in rotation (if any) carries the request; redirects are
    /// followed through the same proxy. Cookies for the target domain are
    /// attached and cookies set by responses are stored.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `referer` - Referer header value; `None` or empty omits the header
    ///
    /// # Returns
    ///
    /// * `Ok(Response)` - The final response, whatever its status code
    /// * `Err(FetchError)` - Invalid URL, unusable proxy entry, or transport failure
    pub async fn get(&self, url: &str, referer: Option<&str>) -> Result<Response, FetchError> {
        let target = Url::parse(url)?;
        let proxy = self.proxies.next_proxy()?;
        let client = self.client_for(proxy.as_ref())?;

        match &proxy {
            Some(proxy) => tracing::debug!("GET {} via {}", target, proxy),
            None => tracing::debug!("GET {}", target),
        }

        let mut request = client.get(target).header(USER_AGENT, &self.user_agent);
        if let Some(referer) = referer.filter(|r| !r.is_empty()) {
            request = request.header(REFERER, referer);
        }

        request.send().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })
    }

    /// The user agent sent with every request
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn proxies(&self) -> &Arc<ProxyRotator> {
        &self.proxies
    }

    pub fn cookies(&self) -> &Arc<CookieStore> {
        &self.cookies
    }

    /// Returns the transport for a proxy, building it on first use
    fn client_for(&self, proxy: Option<&Url>) -> Result<Client, FetchError> {
        let Some(proxy) = proxy else {
            return Ok(self.direct.clone());
        };

        let mut proxied = self.proxied.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = proxied.get(proxy) {
            return Ok(client.clone());
        }

        let client = build_http_client(&self.transport, &self.cookies, Some(proxy))?;
        proxied.insert(proxy.clone(), client.clone());
        Ok(client)
    }
}

/// Builds a reqwest client sharing the cookie store
///
/// Without a proxy the client connects directly and ignores proxy
/// environment variables.
fn build_http_client(
    transport: &TransportOptions,
    cookies: &Arc<CookieStore>,
    proxy: Option<&Url>,
) -> Result<Client, FetchError> {
    let mut builder = Client::builder()
        .cookie_provider(Arc::clone(cookies))
        .connect_timeout(transport.connect_timeout())
        .redirect(Policy::limited(transport.max_redirects))
        .gzip(true)
        .brotli(true);
    if let Some(timeout) = transport.timeout() {
        builder = builder.timeout(timeout);
    }

    let builder = match proxy {
        Some(proxy) => {
            // Parsed URLs can still name schemes reqwest cannot proxy through
            let proxy = Proxy::all(proxy.clone()).map_err(|source| ProxyError::Unsupported {
                entry: proxy.to_string(),
                source,
            })?;
            builder.proxy(proxy)
        }
        None => builder.no_proxy(),
    };

    Ok(builder.build()?)
}
