//! In-process MediaRemote access through `objc2`.
//!
//! Loads the private framework and asks `MRNowPlayingRequest` for the local
//! player path and item, the same accessors the JXA script uses. On macOS
//! 15.4 and later the framework refuses unsigned callers; the request then
//! comes back nil and this reports "no active player".

use anyhow::{Context, Result};
use log::debug;
use objc2::msg_send;
use objc2::rc::Retained;
use objc2::runtime::{AnyClass, AnyObject};
use objc2_foundation::{NSBundle, NSNumber, NSString};
use std::ffi::CStr;

use super::{NowPlayingProvider, RawNowPlaying};
use crate::convert::ForeignValue;
use crate::info_bag::{InfoBag, InfoKey};

const FRAMEWORK_PATH: &str = "/System/Library/PrivateFrameworks/MediaRemote.framework";

/// Private class behind `kCFBooleanTrue`/`kCFBooleanFalse`. It is an
/// NSNumber subclass, so it has to be recognised before the NSNumber arm.
const BOOLEAN_CLASS: &CStr = c"__NSCFBoolean";

#[derive(Default)]
pub struct MediaRemoteProvider;

impl MediaRemoteProvider {
    pub fn new() -> Self {
        Self
    }
}

impl NowPlayingProvider for MediaRemoteProvider {
    fn name(&self) -> &'static str {
        "framework"
    }

    fn query_now_playing(&self) -> Result<RawNowPlaying> {
        // SAFETY: `traverse` only sends messages with the selectors and
        // argument types MediaRemote declares; exceptions are caught here.
        let caught = unsafe { objc2::exception::catch(traverse) };

        match caught {
            Ok(result) => result,
            Err(Some(exception)) => anyhow::bail!("MediaRemote raised {exception:?}"),
            Err(None) => anyhow::bail!("MediaRemote raised an unknown exception"),
        }
    }
}

fn traverse() -> Result<RawNowPlaying> {
    let request = request_class()?;

    // SAFETY: class methods of MRNowPlayingRequest returning objects or nil.
    let player_path: Option<Retained<AnyObject>> =
        unsafe { msg_send![request, localNowPlayingPlayerPath] };
    let player_path = player_path.context("no active player")?;

    let client: Option<Retained<AnyObject>> = unsafe { msg_send![&*player_path, client] };
    let client = client.context("no active player")?;

    let bundle_id: Option<Retained<AnyObject>> = unsafe { msg_send![&*client, bundleIdentifier] };
    let player = foreign_value(bundle_id.as_deref());
    debug!("MediaRemote player: {player:?}");

    let item: Option<Retained<AnyObject>> = unsafe { msg_send![request, localNowPlayingItem] };
    let item = item.context("no now playing item")?;

    let info: Option<Retained<AnyObject>> = unsafe { msg_send![&*item, nowPlayingInfo] };
    let info = info.context("no now playing info")?;

    let bag: InfoBag = InfoKey::ALL
        .into_iter()
        .map(|key| {
            let name = NSString::from_str(key.media_remote_key());
            // SAFETY: `info` is an NSDictionary keyed by NSString.
            let value: Option<Retained<AnyObject>> =
                unsafe { msg_send![&*info, objectForKey: &*name] };
            (key, foreign_value(value.as_deref()))
        })
        .collect();

    Ok(RawNowPlaying { player, info: bag })
}

fn request_class() -> Result<&'static AnyClass> {
    let path = NSString::from_str(FRAMEWORK_PATH);

    #[allow(unused_unsafe)]
    let bundle = unsafe { NSBundle::bundleWithPath(&path) }
        .with_context(|| format!("MediaRemote.framework not found at {FRAMEWORK_PATH}"))?;

    #[allow(unused_unsafe)]
    let loaded = unsafe { bundle.load() };
    if !loaded {
        anyhow::bail!("MediaRemote.framework could not be loaded");
    }

    AnyClass::get(c"MRNowPlayingRequest")
        .context("MRNowPlayingRequest is not available on this macOS version")
}

/// Map an Objective-C object onto the provider-neutral value type.
fn foreign_value(object: Option<&AnyObject>) -> ForeignValue {
    let Some(object) = object else {
        return ForeignValue::Null;
    };

    if let Some(text) = object.downcast_ref::<NSString>() {
        ForeignValue::Text(text.to_string())
    } else if let Some(number) = object.downcast_ref::<NSNumber>() {
        if is_boolean_class(object.class().name()) {
            ForeignValue::Bool(number.as_bool())
        } else {
            ForeignValue::Number(number.as_f64())
        }
    } else {
        ForeignValue::Unsupported(object.class().name().to_string_lossy().into_owned())
    }
}

fn is_boolean_class(name: &CStr) -> bool {
    name == BOOLEAN_CLASS
}
