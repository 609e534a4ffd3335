use maud::{Markup, html};

use crate::{
    date_filter::{DateRange, FilterScope},
    endpoints::{self, format_endpoint},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// Start and end date inputs that save their value for `scope` as soon as
/// they change.
///
/// `redirect_url` is the page the user is sent back to once the new range has
/// been saved, including any query string that should be kept.
pub fn date_range_controls(scope: FilterScope, range: &DateRange, redirect_url: &str) -> Markup {
    let endpoint = format_endpoint(endpoints::DATE_FILTER, scope.as_path_segment());

    let date_input = |edited: &str, label: &str, value: Option<String>| {
        let input_id = format!("{}-{edited}-date", scope.as_path_segment());

        html! {
            form
                hx-post=(endpoint)
                hx-trigger="change"
                hx-target-error="#alert-container"
                class="flex flex-col"
            {
                input type="hidden" name="edited" value=(edited);
                input type="hidden" name="redirect_url" value=(redirect_url);

                label for=(input_id) class=(FORM_LABEL_STYLE) { (label) }

                input
                    id=(input_id)
                    type="date"
                    name="date"
                    value=[value]
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    };

    html! {
        div class="flex flex-wrap gap-4 items-end mb-4" data-date-filter=(scope.as_path_segment())
        {
            (date_input("start", "Start Date", range.start.map(|date| date.to_string())))
            (date_input("end", "End Date", range.end.map(|date| date.to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::date_filter::{DateRange, FilterScope};

    use super::date_range_controls;

    #[test]
    fn renders_one_form_per_side() {
        let range = DateRange::new(date!(2024 - 01 - 01), date!(2024 - 01 - 31));

        let markup = date_range_controls(FilterScope::Reports, &range, "/reports");
        let html = Html::parse_fragment(&markup.into_string());

        let forms = html
            .select(&Selector::parse("form").unwrap())
            .collect::<Vec<_>>();
        assert_eq!(forms.len(), 2);
        for form in &forms {
            assert_eq!(
                form.value().attr("hx-post"),
                Some("/api/date_filters/reports")
            );
        }

        let dates = html
            .select(&Selector::parse("input[type=date]").unwrap())
            .map(|input| input.value().attr("value").unwrap_or_default().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(dates, ["2024-01-01", "2024-01-31"]);
    }
}
