//! Request Classifier
//!
//! Pure mapping from an OpenRTB request to normalized auction features.
//! Apart from generated tracking ids there is no randomness and no I/O.

use crate::device::{browser_from_user_agent, classify_device, os_from_user_agent};
use crate::identity::extract_user_ids;
use crate::ids::{AD_UNIT_PREFIX, PUBLISHER_PREFIX, SITE_PREFIX, id_or_generate};
use crate::openrtb::{Audio, BidRequest, Geo, Imp, Native, Video};
use crate::page::infer_page_type;
use bidroute_core::{
    AdFormat, AdPosition, AdSize, ClassifiedRequest, ConnectionType, GeneratedIds,
};
use bidroute_ports::{Clock, ConsentParser, ConsentSignals};
use log::debug;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::sync::Arc;
use uuid::Uuid;

const UNKNOWN_COUNTRY: &str = "UNKNOWN";

pub struct RequestClassifier {
    clock: Arc<dyn Clock>,
    consent_parser: Arc<dyn ConsentParser>,
}

impl RequestClassifier {
    pub fn new(clock: Arc<dyn Clock>, consent_parser: Arc<dyn ConsentParser>) -> Self {
        Self {
            clock,
            consent_parser,
        }
    }

    /// Classify the request's first impression
    pub fn classify(&self, request: &BidRequest) -> ClassifiedRequest {
        self.classify_impression(request, request.imp.first())
    }

    /// Classify every impression; a request without impressions yields one
    /// default-featured entry so the auction can still be tracked
    pub fn classify_impressions(&self, request: &BidRequest) -> Vec<ClassifiedRequest> {
        if request.imp.is_empty() {
            return vec![self.classify_impression(request, None)];
        }
        request
            .imp
            .iter()
            .map(|imp| self.classify_impression(request, Some(imp)))
            .collect()
    }

    fn classify_impression(&self, request: &BidRequest, imp: Option<&Imp>) -> ClassifiedRequest {
        let mut classified = ClassifiedRequest::at(self.clock.now());

        classified.request_id = if request.id.trim().is_empty() {
            Uuid::new_v4().to_string()
        } else {
            request.id.clone()
        };

        // Inventory
        if let Some(imp) = imp {
            classified.ad_format = ad_format(imp);
            classified.ad_sizes = ad_sizes(imp);
            classified.position = position(imp, classified.ad_format);
            classified.floor_price = imp
                .bidfloor
                .filter(|floor| floor.is_finite() && *floor > 0.0)
                .and_then(Decimal::from_f64)
                .map(|floor| floor.round_dp(6));
            if let Some(currency) = imp.bidfloorcur.as_deref().filter(|c| !c.is_empty()) {
                classified.floor_currency = currency.to_string();
            }
        }

        // Device
        let device = request.device.as_ref();
        classified.device_type = classify_device(device);
        let ua = device.and_then(|d| d.ua.as_deref()).unwrap_or_default();
        classified.os = device
            .and_then(|d| d.os.clone())
            .filter(|os| !os.is_empty())
            .unwrap_or_else(|| os_from_user_agent(ua));
        classified.browser = browser_from_user_agent(ua);
        classified.connection_type = device
            .and_then(|d| d.connectiontype)
            .map(ConnectionType::from_openrtb)
            .unwrap_or_default();

        // Geo: device geo is authoritative, user geo is the fallback
        let geo = device
            .and_then(|d| d.geo.as_ref())
            .or_else(|| request.user.as_ref().and_then(|u| u.geo.as_ref()));
        apply_geo(&mut classified, geo);

        // Publisher
        self.apply_publisher(&mut classified, request, imp);

        // User
        classified.user_ids = extract_user_ids(request.user.as_ref());
        classified.consent = self.consent_parser.parse(&consent_signals(request));

        debug!(
            "[CLASSIFY] {} -> {} {} {} sizes={} ids={}",
            classified.request_id,
            classified.ad_format,
            classified.device_type,
            classified.country,
            classified.ad_sizes.len(),
            classified.user_ids.len()
        );

        classified
    }

    fn apply_publisher(
        &self,
        classified: &mut ClassifiedRequest,
        request: &BidRequest,
        imp: Option<&Imp>,
    ) {
        let site = request.site.as_ref();
        let app = request.app.as_ref();

        let publisher_id = site
            .and_then(|s| s.publisher.as_ref())
            .or_else(|| app.and_then(|a| a.publisher.as_ref()))
            .and_then(|p| p.id.as_deref());
        let site_id = site
            .and_then(|s| s.id.as_deref())
            .or_else(|| app.and_then(|a| a.id.as_deref()));
        let ad_unit_id = imp
            .and_then(|i| i.tagid.as_deref())
            .filter(|t| !t.trim().is_empty())
            .or_else(|| imp.map(|i| i.id.as_str()));

        let (publisher_id, generated_publisher) = id_or_generate(publisher_id, PUBLISHER_PREFIX);
        let (site_id, generated_site) = id_or_generate(site_id, SITE_PREFIX);
        let (ad_unit_id, generated_unit) = id_or_generate(ad_unit_id, AD_UNIT_PREFIX);

        classified.publisher_id = publisher_id;
        classified.site_id = site_id;
        classified.ad_unit_id = ad_unit_id;
        classified.generated_ids = GeneratedIds {
            publisher_id: generated_publisher,
            site_id: generated_site,
            ad_unit_id: generated_unit,
        };

        classified.is_app = site.is_none() && app.is_some();
        classified.domain = site
            .and_then(|s| s.domain.clone())
            .or_else(|| app.and_then(|a| a.domain.clone().or_else(|| a.bundle.clone())))
            .unwrap_or_default();
        classified.page_url = site.and_then(|s| s.page.clone()).unwrap_or_default();
        classified.page_type = infer_page_type(site);

        let mut categories: Vec<String> = Vec::new();
        let sources = site
            .map(|s| {
                let content = s.content.as_ref().map(|c| c.cat.as_slice()).unwrap_or(&[]);
                [s.cat.as_slice(), s.pagecat.as_slice(), content]
            })
            .or_else(|| {
                app.map(|a| {
                    let content = a.content.as_ref().map(|c| c.cat.as_slice()).unwrap_or(&[]);
                    [a.cat.as_slice(), &[][..], content]
                })
            });
        for category in sources.into_iter().flatten().flatten() {
            if !category.is_empty() && !categories.contains(category) {
                categories.push(category.clone());
            }
        }
        classified.page_categories = categories;
    }
}

/// First populated format wins: video > native > audio > banner
fn ad_format(imp: &Imp) -> AdFormat {
    if imp.video.as_ref().is_some_and(Video::is_populated) {
        AdFormat::Video
    } else if imp.native.as_ref().is_some_and(Native::is_populated) {
        AdFormat::Native
    } else if imp.audio.as_ref().is_some_and(Audio::is_populated) {
        AdFormat::Audio
    } else {
        AdFormat::Banner
    }
}

/// Banner `format[]`, else banner w/h, else (only then) video player size
fn ad_sizes(imp: &Imp) -> Vec<AdSize> {
    let mut sizes = Vec::new();

    if let Some(banner) = &imp.banner {
        sizes.extend(
            banner
                .format
                .iter()
                .filter(|f| f.w > 0 && f.h > 0)
                .map(|f| AdSize::new(f.w, f.h)),
        );
        if sizes.is_empty()
            && let (Some(w), Some(h)) = (banner.w, banner.h)
            && w > 0
            && h > 0
        {
            sizes.push(AdSize::new(w, h));
        }
    }

    if sizes.is_empty()
        && let Some(video) = &imp.video
        && let (Some(w), Some(h)) = (video.w, video.h)
        && w > 0
        && h > 0
    {
        sizes.push(AdSize::new(w, h));
    }

    sizes
}

fn position(imp: &Imp, format: AdFormat) -> AdPosition {
    let pos = match format {
        AdFormat::Video => imp.video.as_ref().and_then(|v| v.pos),
        _ => imp.banner.as_ref().and_then(|b| b.pos),
    };
    pos.map(AdPosition::from_openrtb).unwrap_or_default()
}

fn apply_geo(classified: &mut ClassifiedRequest, geo: Option<&Geo>) {
    let Some(geo) = geo else {
        return;
    };
    classified.country = geo
        .country
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());
    classified.region = geo.region.clone().unwrap_or_default();
    classified.dma = geo.metro.clone().unwrap_or_default();
}

/// Lift the privacy fields, preferring 2.6 locations over `ext`
fn consent_signals(request: &BidRequest) -> ConsentSignals {
    let regs = request.regs.as_ref();
    let regs_ext = regs.and_then(|r| r.ext.as_ref());
    let user = request.user.as_ref();

    ConsentSignals {
        gdpr: regs
            .and_then(|r| r.gdpr)
            .or_else(|| regs_ext.and_then(|e| e.gdpr)),
        coppa: regs.and_then(|r| r.coppa),
        consent_string: user.and_then(|u| {
            u.consent
                .clone()
                .or_else(|| u.ext.as_ref().and_then(|e| e.consent.clone()))
        }),
        us_privacy: regs
            .and_then(|r| r.us_privacy.clone())
            .or_else(|| regs_ext.and_then(|e| e.us_privacy.clone())),
        gpp: regs.and_then(|r| r.gpp.clone()),
        gpp_sid: regs.map(|r| r.gpp_sid.clone()).unwrap_or_default(),
    }
}
