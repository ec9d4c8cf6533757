use axum::response::Html;

pub async fn index() -> Html<&'static str> {
    Html(
        "<h2>Your top artists, one playlist.</h2>\
         <p>Log in and a playlist of the most popular tracks by your top artists is created for you.</p>\
         <p><a href='/login'>Login with Spotify</a></p>",
    )
}
