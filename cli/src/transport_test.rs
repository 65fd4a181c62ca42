use super::*;

#[test]
fn methods_map_one_to_one() {
    assert_eq!(reqwest_method(Method::Get), reqwest::Method::GET);
    assert_eq!(reqwest_method(Method::Patch), reqwest::Method::PATCH);
    assert_eq!(reqwest_method(Method::Delete), reqwest::Method::DELETE);
}

#[test]
fn transport_builds_with_default_config() {
    assert!(ReqwestTransport::new(ClientConfig::default()).is_ok());
}

#[test]
fn navigator_moves_and_records_redirect() {
    let navigator = TerminalNavigator::at("/my-registrations");
    let redirect = Redirect::to_login("/my-registrations");

    navigator.redirect(&redirect);
    assert_eq!(navigator.current_path(), "/login?from=%2Fmy-registrations");
    assert_eq!(navigator.last_redirect(), Some(redirect));
}

#[test]
fn hints_distinguish_login_from_home() {
    assert!(redirect_hint(&Redirect::to_login("/profile")).contains("kidz login"));
    assert!(redirect_hint(&Redirect::to_login("/profile")).contains("/profile"));
    assert_eq!(redirect_hint(&Redirect::to_home()), "Your account role cannot use this command.");
}
