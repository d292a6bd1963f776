pub fn native_bridge_available() -> bool {
    false
}

pub async fn get_item(_key: &str) -> Result<Option<String>, String> {
    Ok(None)
}

pub async fn set_item(_key: &str, _value: &str) -> Result<(), String> {
    Ok(())
}

pub async fn remove_item(_key: &str) -> Result<(), String> {
    Ok(())
}

pub async fn clear() -> Result<(), String> {
    Ok(())
}

pub async fn keys() -> Result<Vec<String>, String> {
    Ok(Vec::new())
}
