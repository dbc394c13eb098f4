//! Server-rendered HTML. The pages never echo submitted values back.

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>UniMatch</title>
  <link rel="stylesheet" href="/static/style.css">
</head>
<body>
  <nav><a href="/">Sign up</a> <a href="/roadmap">Roadmap</a></nav>
  <main>
"#;

const FOOT: &str = r#"  </main>
</body>
</html>
"#;

const FORM: &str = r#"    <h1>Find your match</h1>
    <form method="post" action="/submit">
      <label>Name <input name="name" required></label>
      <label>Student number <input name="student_number" required></label>
      <label>I am
        <select name="gender" required>
          <option value="male">Male</option>
          <option value="female">Female</option>
          <option value="other">Other</option>
        </select>
      </label>
      <label>Interested in
        <select name="interested_in" required>
          <option value="male">Male</option>
          <option value="female">Female</option>
          <option value="other">Other</option>
        </select>
      </label>
      <label>WhatsApp <input name="whatsapp" type="tel" required></label>
      <label>What are you looking for?
        <textarea name="looking_for" rows="4"></textarea>
      </label>
      <label>Tell us about yourself
        <textarea name="about_me" rows="4"></textarea>
      </label>
      <button type="submit">Submit</button>
    </form>
"#;

const CONFIRMATION: &str = r#"    <p class="notice">Thanks! Your answers were saved. We will reach out on WhatsApp when matches are in.</p>
"#;

const ROADMAP: &str = r#"    <h1>Roadmap</h1>
    <ol>
      <li>Sign-ups open: fill in the form once.</li>
      <li>Matching: everyone is paired on what they look for and who they are.</li>
      <li>Introductions: matched pairs receive each other's WhatsApp.</li>
    </ol>
"#;

/// Sign-up page. `processed` adds the confirmation banner shown after a
/// successful submission.
pub fn index(processed: bool) -> String {
    let mut page = String::with_capacity(HEAD.len() + FORM.len() + FOOT.len() + 128);
    page.push_str(HEAD);
    if processed {
        page.push_str(CONFIRMATION);
    }
    page.push_str(FORM);
    page.push_str(FOOT);
    page
}

pub fn roadmap() -> String {
    format!("{HEAD}{ROADMAP}{FOOT}")
}
