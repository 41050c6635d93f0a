/// Two pages: a landing page with a nested action and a bound table, and a
/// contact page whose form fields come from the dictionary.
pub const SPECIFICATION: &str = "\
== Main page
{section MySection}
* {action Go}
{table|ColA|ColB}

== Contact
{form Write to us|Email|Country}
{label Item}
{label Item}
";

pub const DICTIONARY: &str = "\
* Email: Where we can reach you
** placeholder: name@example.com
* Country
** input: select
* Mail=Email
";

pub const DATA: &str = r#"<data>
<main_page>
  <_table>
    <row><cola>A1</cola><colb>B1</colb></row>
    <row><cola>A2</cola><colb>B2</colb></row>
  </_table>
</main_page>
<default>
  <country>
    <option value="se">Sweden</option>
    <option value="no">Norway</option>
  </country>
  <prices>
    <row><name>Tea</name><price currency="EUR">2</price></row>
  </prices>
  <visitors>1024</visitors>
</default>
</data>"#;
