use js_sys::Promise;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{CLEAR_COMMAND, GET_ITEM_COMMAND, KEYS_COMMAND, REMOVE_ITEM_COMMAND, SET_ITEM_COMMAND};

#[wasm_bindgen(inline_js = r#"
function nativeCore() {
  const tauri = globalThis.__TAURI__;
  if (tauri && tauri.core && typeof tauri.core.invoke === 'function') {
    return tauri.core;
  }
  return null;
}

export function jsNativeStorageAvailable() {
  return nativeCore() !== null;
}

export async function jsNativeStorageInvoke(command, args) {
  const core = nativeCore();
  if (core === null) {
    throw new Error('native storage bridge is unavailable');
  }
  return await core.invoke(command, args);
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = jsNativeStorageAvailable)]
    fn js_native_storage_available() -> bool;
    #[wasm_bindgen(js_name = jsNativeStorageInvoke)]
    fn js_native_storage_invoke(command: &str, args: JsValue) -> Promise;
}

#[derive(Serialize)]
struct KeyArgs<'a> {
    key: &'a str,
}

#[derive(Serialize)]
struct KeyValueArgs<'a> {
    key: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct NoArgs {}

fn js_error_to_string(err: JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Ok(message) = js_sys::Reflect::get(&err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return text;
        }
    }
    format!("{err:?}")
}

async fn invoke<A: Serialize>(command: &str, args: &A) -> Result<JsValue, String> {
    let args = args
        .serialize(&Serializer::json_compatible())
        .map_err(|e| e.to_string())?;
    JsFuture::from(js_native_storage_invoke(command, args))
        .await
        .map_err(js_error_to_string)
}

pub fn native_bridge_available() -> bool {
    js_native_storage_available()
}

pub async fn get_item(key: &str) -> Result<Option<String>, String> {
    let value = invoke(GET_ITEM_COMMAND, &KeyArgs { key }).await?;
    if value.is_null() || value.is_undefined() {
        Ok(None)
    } else {
        value
            .as_string()
            .map(Some)
            .ok_or_else(|| "native storage returned non-string payload".to_string())
    }
}

pub async fn set_item(key: &str, value: &str) -> Result<(), String> {
    let _ = invoke(SET_ITEM_COMMAND, &KeyValueArgs { key, value }).await?;
    Ok(())
}

pub async fn remove_item(key: &str) -> Result<(), String> {
    let _ = invoke(REMOVE_ITEM_COMMAND, &KeyArgs { key }).await?;
    Ok(())
}

pub async fn clear() -> Result<(), String> {
    let _ = invoke(CLEAR_COMMAND, &NoArgs {}).await?;
    Ok(())
}

pub async fn keys() -> Result<Vec<String>, String> {
    let value = invoke(KEYS_COMMAND, &NoArgs {}).await?;
    from_value(value).map_err(|e| e.to_string())
}
